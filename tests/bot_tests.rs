mod common;

use common::{fixture_setup, parse_fixture, Fixture};
use tile_mapper::{BotState, Command, Position, TileMapper};

fn long_corridor() -> Fixture {
    parse_fixture(
        "
        ■■■■■■■■■■
        ■S□□□□□□□■
        ■□■■■■■■□■
        ■□□□□□□□G■
        ■■■■■■■■■■
        ",
    )
    .unwrap()
}

fn widget_for(fixture: &Fixture) -> TileMapper {
    TileMapper::with_map(fixture_setup(fixture), fixture.map())
}

#[test]
fn test_bot_loops_static_path() {
    let fixture = long_corridor();
    let mut widget = widget_for(&fixture);
    let path: Vec<Position> = widget.path().unwrap().to_vec();
    let n = path.len();
    assert_eq!(n, 10);

    for lap in 0..4 {
        for step in 1..=n {
            widget.apply(&Command::Tick);
            assert_eq!(widget.bot_index(), step % n, "lap {} step {}", lap, step);
            assert_eq!(widget.bot_position(), path[step % n]);
        }
        assert_eq!(widget.bot_index(), 0);
        assert_eq!(widget.bot_position(), fixture.start);
    }
}

#[test]
fn test_bot_pinned_to_start_when_blocked() {
    let fixture = long_corridor();
    let mut widget = widget_for(&fixture);
    for _ in 0..3 {
        widget.apply(&Command::Tick);
    }
    assert_eq!(widget.bot_state(), BotState::Advancing);
    assert_ne!(widget.bot_position(), fixture.start);

    // Wall off the goal
    widget.apply(&Command::BeginDrag { x: 7, y: 3 });
    widget.apply(&Command::PaintCell { x: 8, y: 2 });
    widget.apply(&Command::EndDrag);
    assert_eq!(widget.path(), None);

    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_state(), BotState::IdleAtStart);
    assert_eq!(widget.bot_position(), fixture.start);
    assert_eq!(widget.bot_index(), 0);

    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_position(), fixture.start);
}

#[test]
fn test_shrinking_path_mid_route_never_reads_past_end() {
    // Long way round via the top row, shortcut available once (5,2) is opened
    let fixture = parse_fixture(
        "
        ■■■■■■■■■■■
        ■□□□□□□□□□■
        ■□■■■■■■■□■
        ■□■■■■■■■□■
        ■S■■■■■■■G■
        ■■■■■■■■■■■
        ",
    )
    .unwrap();
    let mut widget = widget_for(&fixture);
    let long = widget.path().unwrap().len();
    assert_eq!(long, 15);

    for _ in 0..12 {
        widget.apply(&Command::Tick);
    }
    assert_eq!(widget.bot_index(), 12);

    // Open a straight corridor along the bottom row
    widget.apply(&Command::SelectTool { tool: tile_mapper::Tool::Floor });
    widget.apply(&Command::BeginDrag { x: 2, y: 4 });
    for x in 3..=8 {
        widget.apply(&Command::PaintCell { x, y: 4 });
    }
    widget.apply(&Command::EndDrag);

    let short = widget.path().unwrap().len();
    assert_eq!(short, 9);
    assert!(short < 12 + 1);

    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_index(), 0);
    assert_eq!(widget.bot_position(), fixture.start);

    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_position(), Position::new(2, 4));
}

#[test]
fn test_equal_length_reroute_keeps_index() {
    let fixture = long_corridor();
    let mut widget = widget_for(&fixture);
    // Down is expanded before right, so the bottom route wins the tie
    assert_eq!(widget.path().unwrap()[1], Position::new(1, 2));
    widget.apply(&Command::Tick);
    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_index(), 2);

    // Blocking the bottom route switches to the top one of the same length
    widget.apply(&Command::BeginDrag { x: 4, y: 3 });
    widget.apply(&Command::EndDrag);
    assert_eq!(widget.path().unwrap()[1], Position::new(2, 1));
    assert_eq!(widget.path().unwrap().len(), 10);

    widget.apply(&Command::Tick);
    assert_eq!(widget.bot_index(), 3);
    assert_eq!(widget.bot_position(), Position::new(4, 1));
}

#[test]
fn test_update_steps_on_wall_clock_cadence() {
    let fixture = long_corridor();
    let mut widget = widget_for(&fixture);

    let mut steps = 0;
    // 30ms frames for about two seconds
    for frame in 1..=66 {
        let now = frame as f64 * 0.03;
        if widget.update(now) {
            steps += 1;
        }
    }
    // A step needs strictly more than 200ms, so one every 7th frame
    assert_eq!(steps, 9);
}
