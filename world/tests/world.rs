use std::time::Duration;

use robot_chase_core::{
    CellPosition, Command, Direction, EntityKind, Event, GameOutcome, GamePhase, Layout,
    LayoutError, MiddlePosition, PlacementError, PursuitStep, SeasonKind,
};
use robot_chase_world::{self as world, query, Rules, World};

fn base_layout() -> Layout {
    Layout {
        width: 10,
        height: 10,
        target: CellPosition::new(9, 6),
        smart_robot: CellPosition::new(5, 5),
        stupid_robot: CellPosition::new(2, 2),
        walls: Vec::new(),
        mires: Vec::new(),
    }
}

fn load(world: &mut World, layout: Layout) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::LoadLayout { layout }, &mut events);
    events
}

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn mire_cells(world: &World) -> Vec<(CellPosition, bool)> {
    let mut cells: Vec<_> = query::field(world)
        .objects_of(EntityKind::Mire)
        .filter_map(|(_, object)| {
            let cell = object.position().as_cell()?;
            Some((cell, object.entity().as_mire()?.is_frozen()))
        })
        .collect();
    cells.sort();
    cells
}

#[test]
fn new_world_is_empty_and_unstarted() {
    let world = World::new();
    assert_eq!(query::phase(&world), GamePhase::NotStarted);
    assert_eq!(query::field(&world).objects().count(), 0);
    assert!(query::pursuit_snapshot(&world).is_none());
}

#[test]
fn loading_a_layout_starts_the_game() {
    let mut world = World::new();
    let events = load(&mut world, base_layout());

    assert_eq!(events, vec![Event::GameStarted { width: 10, height: 10 }]);
    assert_eq!(query::phase(&world), GamePhase::Running);
    assert_eq!(query::target(&world), Some(CellPosition::new(9, 6)));
    assert_eq!(query::active_season(&world), SeasonKind::Summer);
}

#[test]
fn rejected_layout_leaves_the_field_empty() {
    let mut world = World::new();
    let _ = load(&mut world, base_layout());

    let mut broken = base_layout();
    broken.mires = vec![CellPosition::new(4, 4), CellPosition::new(4, 4)];
    let events = load(&mut world, broken);

    assert_eq!(
        events,
        vec![Event::LayoutRejected {
            reason: LayoutError::Rejected {
                kind: EntityKind::Mire,
                reason: PlacementError::MireAlreadyPresent,
            },
        }]
    );
    assert_eq!(query::phase(&world), GamePhase::NotStarted);
    assert_eq!(query::field(&world).objects().count(), 0);
    assert_eq!(query::smart_robot(&world), None);
}

#[test]
fn out_of_bounds_occupant_is_reported() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.stupid_robot = CellPosition::new(11, 2);

    let events = load(&mut world, layout);

    assert_eq!(
        events,
        vec![Event::LayoutRejected {
            reason: LayoutError::OutOfBounds {
                kind: EntityKind::StupidRobot,
                cell: CellPosition::new(11, 2),
            },
        }]
    );
}

#[test]
fn degenerate_field_is_rejected() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.width = 1;

    let events = load(&mut world, layout);

    assert_eq!(
        events,
        vec![Event::LayoutRejected {
            reason: LayoutError::InvalidDimensions {
                width: 1,
                height: 10,
            },
        }]
    );
}

#[test]
fn robots_may_not_start_on_the_same_cell() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.stupid_robot = layout.smart_robot;

    let events = load(&mut world, layout);

    assert!(matches!(
        events.as_slice(),
        [Event::LayoutRejected {
            reason: LayoutError::Rejected {
                kind: EntityKind::StupidRobot,
                reason: PlacementError::RobotAlreadyPresent,
            },
        }]
    ));
}

#[test]
fn walls_block_the_smart_robot_from_both_sides() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.walls = vec![MiddlePosition::new(
        Direction::South,
        CellPosition::new(5, 4),
    )];
    let _ = load(&mut world, layout);

    assert!(query::has_wall(
        &world,
        MiddlePosition::new(Direction::North, CellPosition::new(5, 5))
    ));

    let events = apply_all(
        &mut world,
        [Command::MoveSmartRobot {
            direction: Direction::North,
        }],
    );
    assert!(events.is_empty());
    assert_eq!(query::smart_robot(&world), Some(CellPosition::new(5, 5)));
}

#[test]
fn smart_robot_cannot_leave_the_field() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.smart_robot = CellPosition::new(10, 10);
    let _ = load(&mut world, layout);

    let events = apply_all(
        &mut world,
        [
            Command::MoveSmartRobot {
                direction: Direction::East,
            },
            Command::MoveSmartRobot {
                direction: Direction::South,
            },
        ],
    );

    assert!(events.is_empty());
}

#[test]
fn smart_robot_slides_across_frozen_mires() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.mires = vec![CellPosition::new(6, 5), CellPosition::new(7, 5)];
    let _ = load(&mut world, layout);

    let events = apply_all(
        &mut world,
        [
            Command::AdvanceSeason,
            Command::MoveSmartRobot {
                direction: Direction::East,
            },
        ],
    );

    assert_eq!(
        events,
        vec![
            Event::SeasonChanged {
                season: SeasonKind::Winter,
            },
            Event::SmartRobotMoved {
                from: CellPosition::new(5, 5),
                to: CellPosition::new(7, 5),
            },
        ]
    );
}

#[test]
fn full_season_cycle_restores_mires() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.mires = vec![
        CellPosition::new(4, 3),
        CellPosition::new(5, 3),
        CellPosition::new(5, 4),
    ];
    let _ = load(&mut world, layout);
    let before = mire_cells(&world);

    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    assert!(mire_cells(&world).iter().all(|(_, frozen)| *frozen));

    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    assert_eq!(mire_cells(&world).len(), 6);

    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    let frozen_after_rain = mire_cells(&world);
    assert_eq!(frozen_after_rain.len(), 3);
    assert!(frozen_after_rain.iter().all(|(_, frozen)| *frozen));

    let _ = apply_all(&mut world, [Command::AdvanceSeason, Command::AdvanceSeason]);
    assert_eq!(query::active_season(&world), SeasonKind::Winter);
    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    let after_two_cycles: Vec<_> = mire_cells(&world)
        .into_iter()
        .filter(|(cell, _)| before.iter().any(|(original, _)| original == cell))
        .collect();
    assert_eq!(after_two_cycles, before);
}

#[test]
fn reloading_restarts_the_season_cycle() {
    let mut world = World::new();
    let _ = load(&mut world, base_layout());
    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    assert_eq!(query::active_season(&world), SeasonKind::Winter);

    let _ = load(&mut world, base_layout());
    assert_eq!(query::active_season(&world), SeasonKind::Summer);
}

#[test]
fn ticks_are_only_reported_while_running() {
    let mut world = World::new();
    let dt = Duration::from_millis(250);
    assert!(apply_all(&mut world, [Command::Tick { dt }]).is_empty());

    let _ = load(&mut world, base_layout());
    assert_eq!(
        apply_all(&mut world, [Command::Tick { dt }]),
        vec![Event::TimeAdvanced { dt }]
    );
}

#[test]
fn blocked_approach_leaves_pursuer_in_place() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.walls = vec![MiddlePosition::new(
        Direction::East,
        CellPosition::new(2, 2),
    )];
    let _ = load(&mut world, layout);

    let events = apply_all(
        &mut world,
        [Command::StepPursuer {
            step: PursuitStep::Approach {
                direction: Direction::East,
            },
        }],
    );

    assert_eq!(events, vec![Event::PursuerTurnEnded]);
    assert_eq!(query::stupid_robot(&world), Some(CellPosition::new(2, 2)));
}

#[test]
fn capture_teleports_onto_the_adjacent_smart_robot() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.stupid_robot = CellPosition::new(5, 4);
    let _ = load(&mut world, layout);

    let events = apply_all(
        &mut world,
        [Command::StepPursuer {
            step: PursuitStep::Capture,
        }],
    );

    assert_eq!(
        events,
        vec![
            Event::StupidRobotMoved {
                from: CellPosition::new(5, 4),
                to: CellPosition::new(5, 5),
            },
            Event::SmartRobotCaught {
                at: CellPosition::new(5, 5),
            },
            Event::PursuerTurnEnded,
        ]
    );
}

#[test]
fn custom_rules_change_the_stuck_duration() {
    let mut world = World::with_rules(Rules::new(1, vec![SeasonKind::Winter]));
    let mut layout = base_layout();
    layout.mires = vec![CellPosition::new(2, 3)];
    let _ = load(&mut world, layout);

    let events = apply_all(
        &mut world,
        [Command::StepPursuer {
            step: PursuitStep::Approach {
                direction: Direction::South,
            },
        }],
    );

    assert!(events.contains(&Event::StupidRobotStuck { turns: 1 }));
    assert_eq!(query::rules(&world).stuck_turns(), 1);
    assert_eq!(query::active_season(&world), SeasonKind::Winter);
}

#[test]
fn rain_mire_returning_after_a_removal_sticks_for_the_full_count() {
    let mut world = World::new();
    let mut layout = base_layout();
    layout.smart_robot = CellPosition::new(8, 8);
    layout.stupid_robot = CellPosition::new(4, 4);
    layout.walls = vec![MiddlePosition::new(Direction::West, CellPosition::new(4, 4))];
    layout.mires = vec![CellPosition::new(5, 5)];
    let _ = load(&mut world, layout);

    let _ = apply_all(&mut world, [Command::AdvanceSeason, Command::AdvanceSeason]);
    assert_eq!(query::active_season(&world), SeasonKind::Summer);
    assert!(query::field(&world).is_mud(CellPosition::new(4, 4)));
    assert_eq!(query::skip_turns(&world), 3);

    let skip = || Command::StepPursuer {
        step: PursuitStep::Skip,
    };
    let _ = apply_all(&mut world, [skip(), skip(), skip()]);
    assert_eq!(query::skip_turns(&world), 0);
    let _ = apply_all(
        &mut world,
        [Command::StepPursuer {
            step: PursuitStep::Approach {
                direction: Direction::West,
            },
        }],
    );
    assert_eq!(query::stupid_robot(&world), Some(CellPosition::new(4, 4)));

    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    assert!(!query::field(&world).is_mud(CellPosition::new(4, 4)));
    let _ = apply_all(&mut world, [Command::AdvanceSeason]);

    assert!(query::field(&world).is_mud(CellPosition::new(4, 4)));
    assert_eq!(query::skip_turns(&world), 3);
}

#[test]
fn game_over_rewinds_the_season_cycle() {
    let mut world = World::new();
    let _ = load(&mut world, base_layout());
    let _ = apply_all(&mut world, [Command::AdvanceSeason]);
    assert_eq!(query::active_season(&world), SeasonKind::Winter);

    let events = apply_all(
        &mut world,
        [Command::FinishGame {
            outcome: GameOutcome::Caught,
        }],
    );

    assert_eq!(
        events,
        vec![Event::GameOver {
            outcome: GameOutcome::Caught,
        }]
    );
    assert_eq!(query::active_season(&world), SeasonKind::Summer);
    assert!(apply_all(&mut world, [Command::AdvanceSeason]).is_empty());
}
