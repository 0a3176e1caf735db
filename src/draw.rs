use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
    TableState, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::venue_map::VenueMap;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use jleague_api::query::MatchRow;
use jleague_api::view::{MatchView, VenueFeature};

static TABS: &[&str; 2] = &["Matches", "Teams"];

/// Shown for blank team cells (fixtures whose opponents are not decided yet).
const UNDECIDED_TEAM: &str = "(未定)";

const HELP_TEXT: &str = "\
Matches tab
  j/k ↑/↓     move through the match table
  PgUp/PgDn   move a page
  Enter       show the row's venue on the map
  Esc         close the venue popup

Teams tab
  j/k ↑/↓     move through the team list
  Space       toggle the team under the cursor
  l           select only the cursor team's league

Anywhere
  a / x       select every team / clear the selection
  1 / 2 / ?   switch tab / help (Esc to leave)
  f           full screen
  \"           show or hide the log pane
  q           quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        match app.state.active_tab {
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(area) = layout.logs {
            draw_logs(f, area);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Matches => 0,
        MenuItem::Teams => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (text, color) = if let Some(err) = app.state.last_error.as_deref() {
        (format!(" {err}"), Color::Red)
    } else if app.state.dataset.is_none() {
        (" Loading match data...".to_string(), Color::DarkGray)
    } else {
        let matches = &app.state.matches;
        let view = matches.view();
        let mut text = format!(
            " {} of {} teams  |  {} matches  |  {} venues",
            matches.filter().len(),
            app.state.teams.directory.len(),
            view.rows.len(),
            view.features.len()
        );
        if !view.unmatched_venues.is_empty() {
            text.push_str(&format!("  |  {} unknown venues", view.unmatched_venues.len()));
        }
        if matches.is_pending() {
            text.push_str("  |  updating...");
        }
        (text, Color::Gray)
    };
    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

// ---------------------------------------------------------------------------
// Matches tab: table + map
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let [table_area, map_area] = LayoutAreas::split_matches(area);
    let controller = &app.state.matches;
    let view = controller.view();

    draw_match_table(f, table_area, view, controller.cursor());

    let map_block = default_border(Color::White).title(" Venues ");
    f.render_widget(
        VenueMap {
            features: &view.features,
            selected: controller.selected_feature_index(),
            block: Some(map_block),
        },
        map_area,
    );

    if let Some(feature) = controller.popup() {
        draw_venue_popup(f, map_area, view, feature);
    }
}

fn draw_match_table(f: &mut Frame, area: Rect, view: &MatchView, cursor: usize) {
    let block = default_border(Color::White).title(" Matches ");

    if view.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No matches for the selected teams")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(["Date", "K/O", "Competition", "Sec", "Home", "", "Away", "Venue"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = view.rows.iter().map(match_row);
    let widths = [
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn match_row(row: &MatchRow) -> Row<'_> {
    let m = &row.game;
    Row::new([
        Cell::from(m.date.as_str()),
        Cell::from(m.kickoff.as_str()),
        Cell::from(m.tournament.as_str()),
        Cell::from(m.section.as_str()),
        Cell::from(team_label(&m.home)),
        Cell::from(score_label(&m.score)),
        Cell::from(team_label(&m.away)),
        Cell::from(m.venue.as_str()),
    ])
}

fn team_label(name: &str) -> &str {
    if name.is_empty() { UNDECIDED_TEAM } else { name }
}

fn score_label(score: &str) -> &str {
    if score.is_empty() { "vs" } else { score }
}

/// One popup line per match: fixture, then attendance and broadcaster when known.
fn popup_line(row: &MatchRow) -> String {
    let m = &row.game;
    let mut line = format!(
        "{} {} {} {} {}",
        m.date,
        m.kickoff,
        team_label(&m.home),
        score_label(&m.score),
        team_label(&m.away)
    );
    if !m.attendance.is_empty() {
        line.push_str(&format!("  {}人", m.attendance));
    }
    if !m.broadcast.is_empty() {
        line.push_str(&format!("  {}", m.broadcast));
    }
    line
}

fn draw_venue_popup(f: &mut Frame, map_area: Rect, view: &MatchView, feature: &VenueFeature) {
    let height = (feature.row_indices.len() as u16 + 4).min(map_area.height.saturating_sub(2));
    let area = Rect::new(
        map_area.x + 1,
        map_area.y + map_area.height.saturating_sub(height + 1),
        map_area.width.saturating_sub(2),
        height,
    );

    let mut lines = vec![
        Line::from(Span::styled(
            feature.long_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{:.4}, {:.4}", feature.lat, feature.lon))
            .style(Style::default().fg(Color::DarkGray)),
    ];
    for row in view.feature_rows(feature) {
        lines.push(Line::from(popup_line(row)));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(default_border(Color::Red).title(format!(" {} ", feature.short_name))),
        area,
    );
}

// ---------------------------------------------------------------------------
// Teams tab: checkbox list
// ---------------------------------------------------------------------------

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Teams ");
    let panel = &app.state.teams;

    if panel.directory.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No teams loaded")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = panel
        .directory
        .teams
        .iter()
        .map(|team| {
            let mark = if app.is_team_selected(&team.name) { "[x]" } else { "[ ]" };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{mark} {}", team_label(&team.name))),
                Span::styled(format!("  {}", team.league), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(panel.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    f.render_widget(Paragraph::new(HELP_TEXT).block(block), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Green));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use jleague_api::Match;

    fn row(score: &str, attendance: &str, broadcast: &str) -> MatchRow {
        MatchRow {
            game: Match {
                date: "02/14(金)".into(),
                kickoff: "19:03".into(),
                home: "Ｇ大阪".into(),
                score: score.into(),
                away: "Ｃ大阪".into(),
                attendance: attendance.into(),
                broadcast: broadcast.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn popup_line_includes_attendance_and_broadcast() {
        assert_eq!(
            popup_line(&row("2-5", "26,102", "ＤＡＺＮ")),
            "02/14(金) 19:03 Ｇ大阪 2-5 Ｃ大阪  26,102人  ＤＡＺＮ"
        );
    }

    #[test]
    fn popup_line_skips_unknown_details() {
        assert_eq!(popup_line(&row("", "", "")), "02/14(金) 19:03 Ｇ大阪 vs Ｃ大阪");
    }

    #[test]
    fn blank_team_gets_a_label() {
        assert_eq!(team_label(""), UNDECIDED_TEAM);
        assert_eq!(team_label("鹿島"), "鹿島");
    }
}
