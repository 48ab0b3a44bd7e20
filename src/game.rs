use std::thread::sleep;

use log::info;

use crate::config::{Config, Geometry};
use crate::error::Result;
use crate::pipe::PIPE_WIDTH;
use crate::round::{Command, Round, RoundState};
use crate::term::{DrawSurface, InputSource, Key, Region};
use crate::TermInt;

const MENU_LINES: [&str; 2] = ["Tap the space bar to fly.", "Hit n to start game."];
const PAUSE_HINT: &str = "Press p to pause. ";
const RESUME_HINT: &str = "Press p to resume.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Menu,
    InRound,
}

pub struct FlappyGame<T> {
    term: T,
    config: Config,
    state: SessionState,
    rounds_played: u32,
}

impl<T: DrawSurface + InputSource> FlappyGame<T> {
    pub fn new(term: T, config: Config) -> Self {
        FlappyGame { term, config, state: SessionState::Menu, rounds_played: 0 }
    }

    pub fn into_term(self) -> T {
        self.term
    }

    /// Menu loop. Returns once the player quits from the menu.
    pub fn run(&mut self) -> Result<()> {
        info!("Session started on a {}x{} field", self.config.geometry.cols, self.config.geometry.rows);
        self.show_menu()?;

        loop {
            match self.state {
                SessionState::Menu => match self.term.wait_key()? {
                    Key::Char('q') | Key::Interrupt => break,
                    Key::Char('n') => self.state = SessionState::InRound,
                    _ => {}
                },
                SessionState::InRound => {
                    let score = self.play()?;
                    self.show_game_over(score)?;
                    self.state = SessionState::Menu;
                }
            }
        }

        info!("Session over after {} rounds", self.rounds_played);
        Ok(())
    }

    /// Plays one round to the end and returns its score.
    pub fn play(&mut self) -> Result<u32> {
        let mut round = Round::new(&self.config.geometry, self.config.seed)?;
        self.draw_round(&round)?;

        loop {
            let key = match round.state() {
                RoundState::Paused => Some(self.term.wait_key()?),
                _ => self.term.poll_key()?,
            };
            let command = key.and_then(to_command);

            match round.step(command) {
                RoundState::Ended(_) => {
                    self.draw_round(&round)?;
                    break;
                }
                RoundState::Paused => self.draw_round(&round)?,
                RoundState::Running => {
                    self.draw_round(&round)?;
                    if command != Some(Command::TogglePause) {
                        sleep(self.config.tick);
                    }
                }
            }
        }

        self.rounds_played += 1;
        Ok(round.score())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_menu(&mut self) -> Result<()> {
        self.term.clear();
        draw_borders(&mut self.term, &self.config.geometry);
        draw_message(&mut self.term, &self.config.geometry, &MENU_LINES);
        self.term.show()
    }

    fn show_game_over(&mut self, score: u32) -> Result<()> {
        let score_line = format!("Score: {}", score);
        let lines = ["You Lose", score_line.as_str(), "", "Hit q to quit.", "Hit n to try again."];

        draw_message(&mut self.term, &self.config.geometry, &lines);
        self.term.show()
    }

    fn draw_round(&mut self, round: &Round) -> Result<()> {
        let geo = self.config.geometry;
        self.term.clear();
        draw_borders(&mut self.term, &geo);

        for pair in round.pipes().pairs() {
            for pipe in [&pair.top, &pair.bottom] {
                if pipe.is_visible() {
                    let region = Region::new(pipe.origin(), pipe.height(), PIPE_WIDTH);
                    self.term.paint(region, &pipe.sprite());
                }
            }
        }

        let bird = round.bird();
        let sprite = bird.sprite();
        let bird_box = bird.bounding_box();
        let region = Region::new(bird.pos(), bird_box.ys.1 - bird_box.ys.0 + 1, bird_box.xs.1 - bird_box.xs.0 + 1);
        self.term.paint(region, sprite);

        let hint = if round.state() == RoundState::Paused { RESUME_HINT } else { PAUSE_HINT };
        let score = format!("Score: {}", round.score());
        self.term.paint(Region::new((1, 1), 2, geo.cols - 2), &[hint, score.as_str()]);

        self.term.show()
    }
}

#[cfg(test)]
impl<T> FlappyGame<T> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn term(&self) -> &T {
        &self.term
    }
}

fn to_command(key: Key) -> Option<Command> {
    match key {
        Key::Char(' ') => Some(Command::Flap),
        Key::Char('p') => Some(Command::TogglePause),
        Key::Char('q') | Key::Interrupt => Some(Command::Quit),
        _ => None,
    }
}

fn draw_borders(surface: &mut impl DrawSurface, geo: &Geometry) {
    let (width, height) = (geo.cols as usize, geo.rows);
    let edge = format!("+{}+", "-".repeat(width - 2));
    let side = format!("|{}|", " ".repeat(width - 2));

    surface.paint(Region::new((0, 0), 1, geo.cols), &[edge.as_str()]);
    for y in 1..height - 1 {
        surface.paint(Region::new((0, y), 1, geo.cols), &[side.as_str()]);
    }
    surface.paint(Region::new((0, height - 1), 1, geo.cols), &[edge.as_str()]);
}

/// Boxed message centered in the field.
fn draw_message(surface: &mut impl DrawSurface, geo: &Geometry, lines: &[&str]) {
    let inner = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 2;
    let edge = format!("+{}+", "-".repeat(inner));
    let mut rows = vec![edge.clone()];
    rows.extend(lines.iter().map(|line| format!("|{line: ^width$}|", line = line, width = inner)));
    rows.push(edge);

    let msg_height = rows.len() as TermInt;
    let msg_width = inner as TermInt + 2;
    let top_left = (
        (geo.cols / 2).saturating_sub(msg_width / 2),
        (geo.rows / 2).saturating_sub(msg_height / 2),
    );

    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    surface.paint(Region::new(top_left, msg_height, msg_width), &refs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::paint_into;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// In-memory terminal fed from a key script. Once the script runs dry,
    /// polling yields nothing and waiting yields `q`.
    struct ScriptedTerm {
        geo: Geometry,
        keys: VecDeque<Key>,
        grid: Vec<char>,
        frames: Vec<String>,
    }

    impl ScriptedTerm {
        fn new(geo: Geometry, keys: &[Key]) -> Self {
            let cells = geo.rows as usize * geo.cols as usize;
            ScriptedTerm { geo, keys: keys.iter().copied().collect(), grid: vec![' '; cells], frames: vec![] }
        }

        fn last_frame(&self) -> &str {
            self.frames.last().map(String::as_str).unwrap_or("")
        }
    }

    impl DrawSurface for ScriptedTerm {
        fn clear(&mut self) {
            self.grid.iter_mut().for_each(|ch| *ch = ' ');
        }

        fn paint(&mut self, region: Region, rows: &[&str]) {
            paint_into(&mut self.grid, (self.geo.cols, self.geo.rows), region, rows);
        }

        fn show(&mut self) -> Result<()> {
            let frame = self
                .grid
                .chunks(self.geo.cols as usize)
                .map(|row| row.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join("\n");
            self.frames.push(frame);
            Ok(())
        }
    }

    impl InputSource for ScriptedTerm {
        fn poll_key(&mut self) -> Result<Option<Key>> {
            Ok(self.keys.pop_front())
        }

        fn wait_key(&mut self) -> Result<Key> {
            Ok(self.keys.pop_front().unwrap_or(Key::Char('q')))
        }
    }

    fn config() -> Config {
        Config { tick: Duration::ZERO, seed: Some(11), ..Config::default() }
    }

    fn game(keys: &[Key]) -> FlappyGame<ScriptedTerm> {
        FlappyGame::new(ScriptedTerm::new(Geometry::default(), keys), config())
    }

    #[test]
    fn idle_round_ends_on_the_ground() {
        let mut g = game(&[]);
        assert_eq!(g.play().unwrap(), 0);
        // Initial frame, one per tick and the crash itself.
        assert_eq!(g.term().frames.len(), 18);

        let last: Vec<&str> = g.term().last_frame().lines().collect();
        assert!(last[2].contains("Score: 0"));
        // The bird is shown where it hit the ground, top row 37.
        assert!(last[38].contains("000  o."));
    }

    #[test]
    fn hud_counts_cleared_pipes() {
        // 18 rows forces every pipe to the minimum height, rows 4-12 stay open.
        let geo = Geometry::new(18, 72);
        let mut keys: Vec<Key> = (1..=40).map(|t| if t % 10 == 1 { Key::Char(' ') } else { Key::Other }).collect();
        keys.push(Key::Char('q'));

        let config = Config { geometry: geo, ..config() };
        let mut g = FlappyGame::new(ScriptedTerm::new(geo, &keys), config);
        assert_eq!(g.play().unwrap(), 1);

        let frames = &g.term().frames;
        assert_eq!(frames.len(), 42);
        assert!(frames[37].contains("Score: 0"));
        assert!(frames[38].contains("Score: 1"));
        assert!(g.term().last_frame().contains("Score: 1"));
    }

    #[test]
    fn quit_mid_round_keeps_the_score() {
        let mut g = game(&[Key::Char(' '), Key::Char('q')]);
        assert_eq!(g.play().unwrap(), 0);
        assert_eq!(g.rounds_played(), 1);
    }

    #[test]
    fn interrupt_quits_a_round() {
        let mut g = game(&[Key::Interrupt]);
        assert_eq!(g.play().unwrap(), 0);
        assert_eq!(g.term().frames.len(), 2);
    }

    #[test]
    fn pause_shows_resume_hint_and_waits() {
        let mut g = game(&[Key::Char('p'), Key::Char('x'), Key::Char(' '), Key::Char('q')]);
        g.play().unwrap();

        let frames = &g.term().frames;
        assert_eq!(frames.len(), 5);
        assert!(frames[1].contains(RESUME_HINT));
        assert!(frames[3].contains(RESUME_HINT));
        // Nothing moved while paused.
        assert_eq!(frames[1], frames[3]);
    }

    #[test]
    fn bird_and_pipes_are_drawn() {
        let mut g = game(&[]);
        g.play().unwrap();

        let first_tick = &g.term().frames[1];
        assert!(first_tick.contains("o."));
        assert!(first_tick.contains("+------+"));
        assert!(first_tick.contains(PAUSE_HINT.trim_end()));
    }

    #[test]
    fn session_plays_rounds_until_quit() {
        let mut g = game(&[Key::Char('x'), Key::Char('n'), Key::Char('q'), Key::Char('n'), Key::Char('q'), Key::Char('q')]);
        g.run().unwrap();

        assert_eq!(g.rounds_played(), 2);
        assert_eq!(g.state(), SessionState::Menu);
        assert!(g.term().last_frame().contains("You Lose"));
        assert!(g.term().last_frame().contains("Score: 0"));
        assert!(g.term().last_frame().contains("Hit n to try again."));
    }

    #[test]
    fn menu_is_shown_first() {
        let mut g = game(&[Key::Char('q')]);
        g.run().unwrap();

        assert_eq!(g.rounds_played(), 0);
        assert_eq!(g.term().frames.len(), 1);
        assert!(g.term().frames[0].contains(MENU_LINES[0]));
        assert!(g.term().frames[0].contains(MENU_LINES[1]));
    }

    #[test]
    fn borders_frame_the_field() {
        let mut term = ScriptedTerm::new(Geometry::new(20, 12), &[]);
        draw_borders(&mut term, &Geometry::new(20, 12));
        term.show().unwrap();

        let rows: Vec<&str> = term.last_frame().lines().collect();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0], "+----------+");
        assert_eq!(rows[10], "|          |");
        assert_eq!(rows[19], "+----------+");
    }
}
