//! ASCII rendering of the field.

use robot_chase_core::{CellPosition, EntityKind, Event, Position};
use robot_chase_world::Field;

/// Draws the field with walls between cells.
///
/// Cells sit on odd rows and columns of a character grid; the even rows and
/// columns in between hold edges. `S` is the smart robot, `X` the stupid
/// robot, `T` the target, `~` mud and `=` ice.
pub(crate) fn render(field: &Field) -> String {
    let columns = field.width() as usize * 2 + 1;
    let rows = field.height() as usize * 2 + 1;
    let mut canvas = vec![vec![' '; columns]; rows];

    for (row, line) in canvas.iter_mut().enumerate() {
        for (column, slot) in line.iter_mut().enumerate() {
            let border_row = row == 0 || row == rows - 1;
            let border_column = column == 0 || column == columns - 1;
            *slot = match (border_row, border_column) {
                (true, true) => '+',
                (true, false) => '-',
                (false, true) => '|',
                (false, false) if row % 2 == 0 && column % 2 == 0 => '+',
                (false, false) if row % 2 == 1 && column % 2 == 1 => '.',
                _ => ' ',
            };
        }
    }

    for y in 1..=to_coordinate(field.height()) {
        for x in 1..=to_coordinate(field.width()) {
            let cell = CellPosition::new(x, y);
            let (row, column) = slot(cell);
            canvas[row][column] = glyph(field, cell);
        }
    }

    for (_, object) in field.objects_of(EntityKind::Wall) {
        let Some(edge) = object.position().as_edge() else {
            continue;
        };
        let (near, far) = edge.separates();
        if !field.contains(near) || !field.contains(far) {
            continue;
        }
        let (near_row, near_column) = slot(near);
        let (far_row, far_column) = slot(far);
        let row = (near_row + far_row) / 2;
        let column = (near_column + far_column) / 2;
        canvas[row][column] = if near_row == far_row { '|' } else { '-' };
    }

    canvas
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn glyph(field: &Field, cell: CellPosition) -> char {
    let kinds: Vec<_> = field
        .objects_at(Position::Cell(cell))
        .map(|(_, object)| object.kind())
        .collect();

    if kinds.contains(&EntityKind::StupidRobot) {
        'X'
    } else if kinds.contains(&EntityKind::SmartRobot) {
        'S'
    } else if kinds.contains(&EntityKind::Target) {
        'T'
    } else if let Some(mire) = field.mire_at(cell) {
        if mire.is_frozen() {
            '='
        } else {
            '~'
        }
    } else {
        '.'
    }
}

fn slot(cell: CellPosition) -> (usize, usize) {
    let row = usize::try_from(cell.y() * 2 - 1).unwrap_or(0);
    let column = usize::try_from(cell.x() * 2 - 1).unwrap_or(0);
    (row, column)
}

fn to_coordinate(side: u32) -> i32 {
    i32::try_from(side).unwrap_or(i32::MAX)
}

/// Human readable line for events worth showing to the player.
pub(crate) fn describe(event: &Event) -> Option<String> {
    match event {
        Event::GameStarted { width, height } => {
            Some(format!("A new game starts on a {width}x{height} field."))
        }
        Event::SmartRobotMoved { from, to } => Some(format!("Smart robot: {from} -> {to}")),
        Event::StupidRobotMoved { from, to } => Some(format!("Stupid robot: {from} -> {to}")),
        Event::StupidRobotStuck { turns } => Some(format!(
            "The stupid robot is stuck in the mud for {turns} turns."
        )),
        Event::SmartRobotCaught { at } => Some(format!("Caught at {at}!")),
        Event::SeasonChanged { season } => {
            let descriptor = season.descriptor();
            Some(format!(
                "Season: {}, {} C, {}",
                descriptor.name,
                descriptor.temperature,
                descriptor.downfall_description()
            ))
        }
        Event::GameOver { outcome } => Some(outcome.message().to_owned()),
        Event::LayoutRejected { reason } => Some(format!("Layout rejected: {reason}")),
        Event::FieldCleared
        | Event::TimeAdvanced { .. }
        | Event::PursuerTurnEnded => None,
    }
}
