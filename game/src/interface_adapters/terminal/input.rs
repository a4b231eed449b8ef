use crate::domain::systems::player::Direction;
use crate::use_cases::PlayerCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn map_key(key: KeyEvent) -> Option<PlayerCommand> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(PlayerCommand::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(PlayerCommand::Quit)
        }
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'e') => Some(PlayerCommand::Interact),
        KeyCode::Char(c) => Direction::from_key(c).map(PlayerCommand::Move),
        _ => None,
    }
}

/// Read keys on a dedicated thread; crossterm's reader blocks.
/// Stops after `Quit`, when `stop` is set, or once the game loop is gone.
pub fn spawn_input_thread(
    commands: mpsc::Sender<PlayerCommand>,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) && !commands.is_closed() {
                let key = match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => event::read(),
                    Err(e) => Err(e),
                };
                let command = match key {
                    Ok(Event::Key(key)) => map_key(key),
                    Ok(_) => None,
                    Err(e) => {
                        error!(error = %e, "keyboard read failed");
                        Some(PlayerCommand::Quit)
                    }
                };
                let Some(command) = command else {
                    continue;
                };
                if commands.blocking_send(command).is_err() || command == PlayerCommand::Quit {
                    break;
                }
            }
            debug!("keyboard thread stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn wasd_moves_in_either_case() {
        assert_eq!(
            map_key(press(KeyCode::Char('w'))),
            Some(PlayerCommand::Move(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('D'))),
            Some(PlayerCommand::Move(Direction::Right))
        );
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        assert_eq!(map_key(press(KeyCode::Esc)), Some(PlayerCommand::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(PlayerCommand::Quit)
        );
    }

    #[test]
    fn e_interacts_and_other_keys_are_ignored() {
        assert_eq!(
            map_key(press(KeyCode::Char('E'))),
            Some(PlayerCommand::Interact)
        );
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut key = press(KeyCode::Char('w'));
        key.kind = KeyEventKind::Release;

        assert_eq!(map_key(key), None);
    }
}
