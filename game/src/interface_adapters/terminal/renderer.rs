use crate::domain::Position;
use crate::domain::events::StarState;
use crate::domain::map::{MONSTER_GLYPH, PLAYER_GLYPH, STAR_GLYPH};
use crate::domain::ports::Renderer;
use crate::domain::world::World;
use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, BufWriter, Stdout, Write};

const PULSING_STAR_GLYPH: char = '✦';
const CHARGING_STAR_GLYPH: char = '◉';
const INVISIBLE_PLAYER_GLYPH: char = '◌';
const HELP_LINE: &str = "WASD move | E interact | ESC quit";

fn star_glyph(state: StarState) -> char {
    match state {
        StarState::Pulsing => PULSING_STAR_GLYPH,
        StarState::Charging => CHARGING_STAR_GLYPH,
        StarState::Visible | StarState::Invisible => STAR_GLYPH,
    }
}

fn put(canvas: &mut [Vec<char>], at: Position, glyph: char) {
    let (Ok(x), Ok(y)) = (usize::try_from(at.x), usize::try_from(at.y)) else {
        return;
    };
    let Some(row) = canvas.get_mut(y) else {
        return;
    };
    if row.len() <= x {
        row.resize(x + 1, ' ');
    }
    row[x] = glyph;
}

/// Lay out one frame as text rows: the map with every actor on top,
/// then the status block.
pub fn compose_frame(world: &World) -> Vec<String> {
    let mut canvas: Vec<Vec<char>> = world
        .grid
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.glyph()).collect())
        .collect();

    for star in world.stars.values().filter(|s| s.visible) {
        put(&mut canvas, star.position, star_glyph(star.state));
    }
    if let Some(monster) = &world.monster {
        put(&mut canvas, monster.position, MONSTER_GLYPH);
    }
    for other in world.others() {
        let initial = other.name.chars().next().unwrap_or('P');
        put(&mut canvas, other.position, initial);
    }
    let player_glyph = if world.is_invisible() {
        INVISIBLE_PLAYER_GLYPH
    } else {
        PLAYER_GLYPH
    };
    put(&mut canvas, world.player, player_glyph);

    let mut frame: Vec<String> = canvas.into_iter().map(String::from_iter).collect();
    frame.push(String::new());
    frame.push(format!("Status: {}", world.status));
    frame.push(format!(
        "Score: {}  Double jumps: {}  Invisible: {}",
        world.score, world.double_jumps, world.invisible_steps
    ));
    frame.push(match &world.self_id {
        Some(id) => format!("Online as {id} with {} others", world.others().count()),
        None => "Offline".to_string(),
    });
    frame.push(HELP_LINE.to_string());
    frame
}

/// Full-screen renderer on the alternate screen. Call `init` before the
/// first frame and `cleanup` before exiting.
pub struct TerminalRenderer {
    writer: BufWriter<Stdout>,
    last_rows: usize,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            last_rows: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, world: &World) -> io::Result<()> {
        let frame = compose_frame(world);
        for (row, line) in frame.iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(
                self.writer,
                MoveTo(0, row),
                Print(line),
                Clear(ClearType::UntilNewLine)
            )?;
        }
        // Blank rows left over from a taller previous frame.
        for row in frame.len()..self.last_rows {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.writer, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        }
        self.last_rows = frame.len();
        self.writer.flush()
    }
}
