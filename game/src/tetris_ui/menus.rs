use engine::surface::{CellSurface, TextCursor};

pub const MENU_TITLE: &str = "=== TETRIS ===";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    Play,
    BestScore,
    Settings,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Play, MenuItem::BestScore, MenuItem::Settings];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::BestScore => "Best Score",
            MenuItem::Settings => "Settings",
        }
    }
}

/// Title screen. Play starts directly, so this is a drawing routine only; nothing
/// navigates between entries.
pub fn draw_title_menu<S: CellSurface + ?Sized>(surface: &mut S, selected: MenuItem) {
    surface.clear();
    let mut cursor = TextCursor::default();
    cursor.write_str(surface, MENU_TITLE);
    cursor.write_str(surface, "\n\n");
    for item in MenuItem::ALL {
        let marker = if item == selected { "> " } else { "  " };
        cursor.write_str(surface, marker);
        cursor.write_str(surface, item.label());
        cursor.write_str(surface, "\n");
    }
}

#[cfg(test)]
mod tests {
    use engine::surface::TextGrid;

    use super::*;

    #[test]
    fn title_menu_marks_the_selected_entry() {
        let mut grid = TextGrid::new();
        draw_title_menu(&mut grid, MenuItem::BestScore);
        assert_eq!(grid.row_text(0), MENU_TITLE);
        assert_eq!(grid.row_text(1), "");
        assert_eq!(grid.row_text(2), "  Play");
        assert_eq!(grid.row_text(3), "> Best Score");
        assert_eq!(grid.row_text(4), "  Settings");
    }
}
