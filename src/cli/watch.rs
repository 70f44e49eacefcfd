//! Watch command implementation - Interactive TUI.

// CLI watch uses intentional casts for display
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use super::{CliError, MatchArgs};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use skyguard::content::{EnemyKind, TowerKind};
use skyguard::game::{Tier, Tower};
use skyguard::geom::Vec2;
use skyguard::{Command, MatchOutcome, MatchSession};
use std::io::stdout;
use std::time::Duration;

/// Logical size of the playing field.
const FIELD_WIDTH: f64 = 800.0;
const FIELD_HEIGHT: f64 = 450.0;
/// Distance the hero is ordered to walk per arrow key press.
const HERO_STEP: f64 = 40.0;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the TUI fails.
pub(crate) fn execute(args: &MatchArgs) -> Result<(), CliError> {
    let config = args.resolve()?;
    let session = MatchSession::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(session);
    let result = run_tui(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

/// App state for the TUI.
struct App {
    session: MatchSession,
    cursor: usize,
    build_kind: usize,
    branch: usize,
    status: String,
}

impl App {
    fn new(session: MatchSession) -> Self {
        Self {
            session,
            cursor: 0,
            build_kind: 1,
            branch: 0,
            status: String::from("Press ? for help"),
        }
    }

    fn slots(&self) -> &'static [Vec2] {
        self.session.state().level.build_slots
    }

    fn selected_slot(&self) -> Option<Vec2> {
        self.slots().get(self.cursor).copied()
    }

    fn tower_on_cursor(&self) -> Option<&Tower> {
        let slot = self.selected_slot()?;
        let id = self.session.state().tower_at(slot)?;
        self.session.state().towers.get(&id)
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.slots().len().max(1);
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
        let tower = self.tower_on_cursor().map(|t| t.id);
        self.session.apply(Command::SelectTower(tower));
    }

    fn submit(&mut self, command: Command, label: &str) {
        let accepted = self.session.apply(command);
        self.status = if accepted {
            format!("{label}: ok")
        } else {
            format!("{label}: rejected")
        };
    }

    fn build(&mut self) {
        let Some(slot) = self.selected_slot() else {
            return;
        };
        let kind = TowerKind::ALL[self.build_kind % TowerKind::ALL.len()];
        self.submit(Command::Build { kind, slot }, kind.def().name);
        let tower = self.tower_on_cursor().map(|t| t.id);
        self.session.apply(Command::SelectTower(tower));
    }

    fn upgrade(&mut self) {
        let Some(tower) = self.tower_on_cursor().map(|t| t.id) else {
            self.status = String::from("No tower on this slot");
            return;
        };
        let branch = Some(self.branch);
        self.submit(Command::Upgrade { tower, branch }, "Upgrade");
    }

    fn sell(&mut self) {
        let Some(tower) = self.tower_on_cursor().map(|t| t.id) else {
            self.status = String::from("No tower on this slot");
            return;
        };
        self.submit(Command::Sell { tower }, "Sell");
        self.session.apply(Command::SelectTower(None));
    }

    fn move_hero(&mut self, dx: f64, dy: f64) {
        let hero = self.session.state().hero.pos;
        let to = Vec2::new(
            (hero.x + dx).clamp(0.0, FIELD_WIDTH),
            (hero.y + dy).clamp(0.0, FIELD_HEIGHT),
        );
        self.submit(Command::MoveHero { to }, "Move hero");
    }

    fn toggle_pause(&mut self) {
        let paused = self.session.state().paused;
        self.session.apply(Command::SetPaused(!paused));
    }

    fn toggle_help(&mut self) {
        let open = !self.session.modal_open();
        self.session.set_modal(open);
    }

    fn restart(&mut self) {
        self.status = match self.session.restart() {
            Ok(()) => String::from("Restarted"),
            Err(e) => format!("Restart failed: {e}"),
        };
        self.cursor = 0;
    }

    /// Handle one key press. Returns `false` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('?') => self.toggle_help(),
            _ if self.session.modal_open() => {}
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('n') => self.submit(Command::CallNextWave, "Next wave"),
            KeyCode::Char('s') => self.submit(Command::ActivateSkill, "Skill"),
            KeyCode::Char('b') => self.build(),
            KeyCode::Char('u') => self.upgrade(),
            KeyCode::Char('x') => self.sell(),
            KeyCode::Char('t') => self.build_kind = (self.build_kind + 1) % TowerKind::ALL.len(),
            KeyCode::Char(c @ '1'..='3') => self.branch = usize::from(c as u8 - b'1'),
            KeyCode::Tab | KeyCode::Char('.') => self.move_cursor(true),
            KeyCode::BackTab | KeyCode::Char(',') => self.move_cursor(false),
            KeyCode::Left => self.move_hero(-HERO_STEP, 0.0),
            KeyCode::Right => self.move_hero(HERO_STEP, 0.0),
            KeyCode::Up => self.move_hero(0.0, -HERO_STEP),
            KeyCode::Down => self.move_hero(0.0, HERO_STEP),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
        true
    }
}

fn run_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), CliError> {
    loop {
        app.session.frame();
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with a short timeout so frames keep coming
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Field
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(chunks[1]);

    render_field(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);
    render_footer(f, chunks[2], app);

    if app.session.modal_open() {
        render_help(f, f.area());
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let status = match state.outcome {
        MatchOutcome::Defeat => "DEFEAT",
        MatchOutcome::Victory => "VICTORY",
        MatchOutcome::InProgress if app.session.is_suspended() => "PAUSED",
        MatchOutcome::InProgress => "RUNNING",
    };

    let title = format!(
        " Skyguard | {} | Wave {} | Lives {} | Gold {:.0} | Score {} | {} ",
        state.level.name, state.wave, state.lives, state.money, state.score, status
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

/// Character grid the field is rasterized into.
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<(char, Color)>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![(' ', Color::Reset); width * height],
        }
    }

    fn plot(&mut self, pos: Vec2, ch: char, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let col = (pos.x / FIELD_WIDTH * (self.width - 1) as f64).round();
        let row = (pos.y / FIELD_HEIGHT * (self.height - 1) as f64).round();
        if col < 0.0 || row < 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = (ch, color);
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|&(ch, color)| {
                            Span::styled(ch.to_string(), Style::default().fg(color))
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }
}

fn tower_glyph(tower: &Tower) -> char {
    let ch = match tower.kind {
        TowerKind::Barracks => 'b',
        TowerKind::Archer => 'a',
        TowerKind::Mage => 'm',
        TowerKind::Cannon => 'c',
        TowerKind::GoldMine => 'g',
        TowerKind::Support => 'h',
    };
    match tower.tier {
        Tier::One => ch,
        Tier::Two | Tier::Three(_) => ch.to_ascii_uppercase(),
    }
}

fn render_field(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let inner_w = usize::from(area.width.saturating_sub(2));
    let inner_h = usize::from(area.height.saturating_sub(2));
    let mut canvas = Canvas::new(inner_w, inner_h);

    for path in state.level.paths {
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let steps = (from.distance(to) / 10.0).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let at = Vec2::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
                canvas.plot(at, '·', Color::DarkGray);
            }
        }
    }
    for (i, &slot) in state.level.build_slots.iter().enumerate() {
        let color = if i == app.cursor { Color::Yellow } else { Color::Gray };
        canvas.plot(slot, 'o', color);
    }
    for tower in state.towers.values() {
        let color = if Some(tower.id) == state.selected_tower {
            Color::Yellow
        } else {
            Color::Blue
        };
        canvas.plot(tower.pos, tower_glyph(tower), color);
        for soldier in tower.soldiers.iter().filter(|s| !s.dead) {
            canvas.plot(soldier.pos, 's', Color::LightBlue);
        }
    }
    for projectile in state.projectiles.values() {
        canvas.plot(projectile.pos, '*', Color::White);
    }
    for enemy in state.enemies.values().filter(|e| e.is_alive()) {
        let color = if enemy.status.is_stunned() {
            Color::Magenta
        } else if enemy.status.freeze > 0 {
            Color::Cyan
        } else {
            Color::Red
        };
        let ch = if enemy.kind == EnemyKind::BOSS {
            'V'
        } else if enemy.flying {
            'w'
        } else {
            'e'
        };
        canvas.plot(enemy.pos, ch, color);
    }
    if !state.hero.dead {
        canvas.plot(state.hero.pos, '@', Color::Green);
    }

    let field = Paragraph::new(canvas.into_lines())
        .block(Block::default().borders(Borders::ALL).title(" Field "));
    f.render_widget(field, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();
    let hero = &state.hero;
    let director = app.session.director();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("{} ", hero.id.def().name),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    if hero.dead {
        lines.push(Line::from(format!("  Respawn in {} ticks", hero.respawn_timer)));
    } else {
        lines.push(Line::from(format!(
            "  HP {:.0}/{:.0}",
            hero.hp, hero.stats.max_hp
        )));
    }
    let skill = if hero.skill_cooldown == 0 {
        String::from("ready")
    } else {
        format!("{:.1}s", hero.skill_cooldown as f64 / 60.0)
    };
    lines.push(Line::from(format!("  Skill: {skill}")));
    lines.push(Line::from(""));

    lines.push(Line::from(format!(
        "Wave {}: {}/{} spawned",
        state.wave,
        director.spawned(),
        director.to_spawn()
    )));
    lines.push(Line::from(format!("Enemies: {}", state.enemies.len())));
    lines.push(Line::from(format!("Kills: {}  Leaks: {}", state.kills, state.leaks)));
    lines.push(Line::from(""));

    let kind = TowerKind::ALL[app.build_kind % TowerKind::ALL.len()];
    lines.push(Line::from(format!(
        "Build: {} ({}g)",
        kind.def().name,
        kind.def().t1.cost
    )));
    lines.push(Line::from(format!("Branch: {}", app.branch + 1)));
    if let Some(tower) = app.tower_on_cursor() {
        let stats = tower.stats();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} (tier {})", stats.name, tower.tier.number()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "  Dmg {:.0}  Range {:.0}",
            stats.damage, stats.range
        )));
        match tower.upgrade_cost(Some(app.branch)) {
            Some((_, cost)) => lines.push(Line::from(format!("  Upgrade: {cost}g"))),
            None => lines.push(Line::from("  Fully upgraded")),
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.status.clone(),
        Style::default().fg(Color::Gray),
    )));

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Status "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.session.state().is_terminal() {
        " [q] Quit  [r] Restart  [?] Help "
    } else {
        " [q] Quit  [Space] Pause  [Tab] Slot  [b/u/x] Build/Upgrade/Sell  [s] Skill  [n] Wave  [?] Help "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let width = area.width.min(52);
    let height = area.height.min(18);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let lines = vec![
        Line::from("Space      pause / resume"),
        Line::from("Tab , .    select build slot"),
        Line::from("t          cycle tower kind to build"),
        Line::from("b          build on the selected slot"),
        Line::from("1 2 3      tier-3 branch for upgrades"),
        Line::from("u          upgrade the selected tower"),
        Line::from("x          sell the selected tower"),
        Line::from("Arrows     move the hero"),
        Line::from("s          hero skill"),
        Line::from("n          call the next wave"),
        Line::from("r          restart"),
        Line::from("?          close this help"),
        Line::from("q          quit"),
    ];
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (simulation paused) "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}
