use robot_chase_core::{CellPosition, Command, Event, GameOutcome, GamePhase, Layout};
use robot_chase_system_referee::Referee;
use robot_chase_world::{self as world, query, World};

fn layout(smart_robot: CellPosition, mires: Vec<CellPosition>) -> Layout {
    Layout {
        width: 10,
        height: 10,
        target: CellPosition::new(9, 6),
        smart_robot,
        stupid_robot: CellPosition::new(1, 1),
        walls: Vec::new(),
        mires,
    }
}

fn drive(world: &mut World, referee: &mut Referee, command: Command) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        referee.handle(&events, query::referee_snapshot(world), &mut commands);
        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
    log
}

#[test]
fn starting_on_the_target_wins_immediately() {
    let mut world = World::new();
    let mut referee = Referee::new();

    let events = drive(
        &mut world,
        &mut referee,
        Command::LoadLayout {
            layout: layout(CellPosition::new(9, 6), Vec::new()),
        },
    );

    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            outcome: GameOutcome::Won
        })
    );
    assert_eq!(query::phase(&world), GamePhase::Finished(GameOutcome::Won));
}

#[test]
fn starting_in_mud_loses_immediately() {
    let mut world = World::new();
    let mut referee = Referee::new();
    let start = CellPosition::new(4, 4);

    let _ = drive(
        &mut world,
        &mut referee,
        Command::LoadLayout {
            layout: layout(start, vec![start]),
        },
    );

    assert_eq!(
        query::phase(&world),
        GamePhase::Finished(GameOutcome::StuckInMud)
    );
}

#[test]
fn thawing_under_the_smart_robot_loses_the_game() {
    let mut world = World::new();
    let mut referee = Referee::new();
    let start = CellPosition::new(4, 4);
    let ice = CellPosition::new(5, 4);

    let _ = drive(
        &mut world,
        &mut referee,
        Command::LoadLayout {
            layout: layout(start, vec![ice]),
        },
    );
    let _ = drive(&mut world, &mut referee, Command::AdvanceSeason);
    let _ = drive(
        &mut world,
        &mut referee,
        Command::MoveSmartRobot {
            direction: robot_chase_core::Direction::East,
        },
    );
    assert_eq!(query::smart_robot(&world), Some(ice));
    assert_eq!(query::phase(&world), GamePhase::Running);

    let events = drive(&mut world, &mut referee, Command::AdvanceSeason);

    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            outcome: GameOutcome::StuckInMud
        })
    );
}
