/// Keyboard handling for the dashboard
///
/// Keys mutate [`Dashboard`] directly. Anything that needs the backend or
/// the filesystem comes back as a [`Command`] for the loop to spawn.
use crate::shared::client::{is_accepted_upload, ADVERTISED_MAX_UPLOAD_BYTES};
use crate::shared::state::{Dashboard, ExportKind, Tab};
use crate::shared::table::table_columns;
use crate::shared::types::Record;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload { path: PathBuf, generation: u64 },
    PredictSingle(Record),
    Export(ExportKind),
    Quit,
}

pub fn upload_hint() -> String {
    format!(
        "Path to a .csv or .json file (max {}MB)",
        ADVERTISED_MAX_UPLOAD_BYTES / (1024 * 1024)
    )
}

pub fn handle_key(dashboard: &mut Dashboard, key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        dashboard.should_quit = true;
        return Some(Command::Quit);
    }

    // Any key dismisses the alert
    if dashboard.alert.take().is_some() {
        return None;
    }

    if dashboard.path_input.is_some() {
        return handle_prompt_key(dashboard, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            dashboard.should_quit = true;
            return Some(Command::Quit);
        }
        KeyCode::Tab => {
            dashboard.active_tab = dashboard.active_tab.next();
            return None;
        }
        KeyCode::BackTab => {
            dashboard.active_tab = dashboard.active_tab.prev();
            return None;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            if let Some(tab) = Tab::from_index(index) {
                dashboard.active_tab = tab;
            }
            return None;
        }
        KeyCode::Char('u') => {
            dashboard.path_input = Some(String::new());
            return None;
        }
        KeyCode::Char('e') => return export(dashboard, ExportKind::Csv),
        KeyCode::Char('r') => return export(dashboard, ExportKind::Report),
        _ => {}
    }

    match dashboard.active_tab {
        Tab::Table => handle_table_key(dashboard, key.code),
        Tab::Simulator => handle_simulator_key(dashboard, key.code),
        _ => None,
    }
}

fn export(dashboard: &mut Dashboard, kind: ExportKind) -> Option<Command> {
    if !dashboard.has_rows() {
        dashboard.notice = Some("No data to export".to_string());
        return None;
    }
    dashboard.notice = Some(format!("Exporting {}...", kind.label()));
    Some(Command::Export(kind))
}

fn handle_prompt_key(dashboard: &mut Dashboard, key: KeyEvent) -> Option<Command> {
    let input = dashboard.path_input.as_mut()?;
    match key.code {
        KeyCode::Esc => {
            dashboard.path_input = None;
        }
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(c) => {
            input.push(c);
        }
        KeyCode::Enter => {
            let raw = input.trim().to_string();
            dashboard.path_input = None;
            if raw.is_empty() {
                return None;
            }
            let path = PathBuf::from(raw);
            if !is_accepted_upload(&path) {
                dashboard.alert = Some("Please choose a .csv or .json file.".to_string());
                return None;
            }
            let generation = dashboard.begin_upload();
            return Some(Command::Upload { path, generation });
        }
        _ => {}
    }
    None
}

fn handle_table_key(dashboard: &mut Dashboard, code: KeyCode) -> Option<Command> {
    let total = dashboard.rows().len();
    match code {
        KeyCode::Left | KeyCode::Char('h') => dashboard.table.select_prev_column(),
        KeyCode::Right | KeyCode::Char('l') => {
            let count = dashboard.column_count();
            dashboard.table.select_next_column(count);
        }
        KeyCode::Char('s') | KeyCode::Enter => {
            let columns = table_columns(dashboard.rows());
            dashboard.table.sort_selected(&columns);
        }
        KeyCode::Char('n') | KeyCode::PageDown => dashboard.table.next_page(total),
        KeyCode::Char('p') | KeyCode::PageUp => dashboard.table.prev_page(total),
        _ => {}
    }
    None
}

fn handle_simulator_key(dashboard: &mut Dashboard, code: KeyCode) -> Option<Command> {
    let sim = &mut dashboard.simulator;
    match code {
        KeyCode::Up | KeyCode::Char('k') => sim.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => sim.select_next(),
        KeyCode::Left | KeyCode::Char('h') => sim.adjust(-1),
        KeyCode::Right | KeyCode::Char('l') => sim.adjust(1),
        KeyCode::Char('H') => sim.adjust(-10),
        KeyCode::Char('L') => sim.adjust(10),
        KeyCode::Enter | KeyCode::Char('p') => {
            return sim.begin_request().map(Command::PredictSingle);
        }
        _ => {}
    }
    None
}
