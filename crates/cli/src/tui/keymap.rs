use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rstnav_core::browser::{Action, Mode};

/// Decodes key presses into browser actions. Tracks the first `g` of `gg`.
#[derive(Debug, Default)]
pub struct Keymap {
    pending_g: bool,
}

impl Keymap {
    pub fn action(&mut self, mode: Mode, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let pending_g = std::mem::take(&mut self.pending_g);
        match mode {
            Mode::Overview => overview_action(key.code),
            Mode::Detail => match key.code {
                KeyCode::Char('g') if pending_g => Some(Action::Top),
                KeyCode::Char('g') => {
                    self.pending_g = true;
                    None
                }
                code => detail_action(code),
            },
        }
    }
}

fn overview_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Right),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn detail_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::Home => Some(Action::Top),
        KeyCode::Char('r') => Some(Action::FocusDependencies),
        KeyCode::Char('R') => Some(Action::FocusReferences),
        KeyCode::Tab => Some(Action::CycleFocus),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Close),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_q_depends_on_mode() {
        let mut keymap = Keymap::default();
        assert_eq!(
            keymap.action(Mode::Overview, key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
        assert_eq!(
            keymap.action(Mode::Detail, key(KeyCode::Char('q'))),
            Some(Action::Close)
        );
    }

    #[test]
    fn test_gg_goes_to_top() {
        let mut keymap = Keymap::default();
        assert_eq!(keymap.action(Mode::Detail, key(KeyCode::Char('g'))), None);
        assert_eq!(
            keymap.action(Mode::Detail, key(KeyCode::Char('g'))),
            Some(Action::Top)
        );
        // an interrupted sequence starts over
        assert_eq!(keymap.action(Mode::Detail, key(KeyCode::Char('g'))), None);
        assert_eq!(
            keymap.action(Mode::Detail, key(KeyCode::Char('j'))),
            Some(Action::Down)
        );
        assert_eq!(keymap.action(Mode::Detail, key(KeyCode::Char('g'))), None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut keymap = Keymap::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(keymap.action(Mode::Overview, ctrl_c), Some(Action::Quit));
        assert_eq!(keymap.action(Mode::Detail, ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_detail_keys() {
        let mut keymap = Keymap::default();
        let cases = [
            (KeyCode::Char('r'), Action::FocusDependencies),
            (KeyCode::Char('R'), Action::FocusReferences),
            (KeyCode::Tab, Action::CycleFocus),
            (KeyCode::Enter, Action::Confirm),
            (KeyCode::Char('h'), Action::Back),
            (KeyCode::Backspace, Action::Back),
            (KeyCode::Esc, Action::Close),
            (KeyCode::Char('G'), Action::Bottom),
        ];
        for (code, action) in cases {
            assert_eq!(keymap.action(Mode::Detail, key(code)), Some(action));
        }
    }

    #[test]
    fn test_releases_are_ignored() {
        let mut keymap = Keymap::default();
        let mut release = key(KeyCode::Char('j'));
        release.kind = KeyEventKind::Release;
        assert_eq!(keymap.action(Mode::Overview, release), None);
    }
}
