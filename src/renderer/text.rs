//! Character-grid frame renderer
//!
//! One character per grid cell. Draw order: vanishing groups, active
//! groups, projectiles, cannon; later layers overwrite earlier ones.

use glam::{IVec2, Vec2};

use crate::settings::Settings;
use crate::sim::{BlockTag, GridMapper};
use crate::snapshot::{BlockView, GameSnapshot};

/// Width of the overheat gauge in characters
const HEAT_BAR_WIDTH: usize = 10;

const EMPTY: char = ' ';
const GROUP_BLOCK: char = '#';
const SHOT_BLOCK: char = 'o';
const PROJECTILE: char = '!';
const CANNON: char = '^';

/// Glyph for a block, dimmed as its alpha drops
fn block_glyph(block: &BlockView) -> Option<char> {
    let a = block.alpha;
    if a <= 0.0 || block.scale <= 0.0 {
        None
    } else if a < 0.33 {
        Some('.')
    } else if a < 0.66 {
        Some('+')
    } else if a < 1.0 {
        Some('*')
    } else {
        Some(match block.tag {
            BlockTag::Group => GROUP_BLOCK,
            BlockTag::Shot => SHOT_BLOCK,
        })
    }
}

/// Overheat gauge, e.g. `[####......]`
pub fn heat_bar(ratio: f32) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * HEAT_BAR_WIDTH as f32).round() as usize).min(HEAT_BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(HEAT_BAR_WIDTH - filled))
}

/// Playfield cells, row-major
struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY; cols * rows],
        }
    }

    /// Off-field cells are ignored
    fn put(&mut self, cell: IVec2, ch: char) {
        if cell.x < 0 || cell.y < 0 {
            return;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x] = ch;
        }
    }

    fn row(&self, y: usize) -> impl Iterator<Item = char> + '_ {
        self.cells[y * self.cols..(y + 1) * self.cols].iter().copied()
    }
}

/// Render a snapshot as a multi-line string
pub fn render_frame(snap: &GameSnapshot, settings: &Settings) -> String {
    let grid: GridMapper = settings.grid();
    let cols = settings.grid_width.max(0) as usize;
    let rows = settings.grid_height.max(0) as usize;
    let mut canvas = Canvas::new(cols, rows);

    let mut draw = |pos: Vec2, ch: char| canvas.put(grid.nearest_cell(pos), ch);

    for group in &snap.vanishing {
        for block in &group.blocks {
            if let Some(ch) = block_glyph(block) {
                draw(block.pos, ch);
            }
        }
    }
    for group in &snap.groups {
        for block in &group.blocks {
            if let Some(ch) = block_glyph(block) {
                draw(block.pos, ch);
            }
        }
    }
    for projectile in &snap.projectiles {
        draw(projectile.pos, PROJECTILE);
    }

    let mut out = String::with_capacity((cols + 3) * (rows + 4));
    out.push_str(&format!(
        "score {:>6}  level {:>2}  heat {}",
        snap.score,
        snap.level,
        heat_bar(snap.heat_ratio())
    ));
    if !snap.running {
        out.push_str("  GAME OVER");
    } else if snap.paused {
        out.push_str("  PAUSED");
    }
    out.push('\n');

    for y in 0..rows {
        out.push('|');
        out.extend(canvas.row(y));
        out.push_str("|\n");
    }

    // Floor threshold, then the cannon row
    out.push('+');
    out.push_str(&"-".repeat(cols));
    out.push_str("+\n");
    out.push(' ');
    for x in 0..cols as i32 {
        out.push(if x == snap.cannon_col { CANNON } else { EMPTY });
    }
    out.push('\n');
    out
}
