//! Rendering - draws the active buffer, status line and message line.

use eyre::Result;
use ratatui::{
  Frame,
  layout::Rect,
  style::{
    Color,
    Modifier,
    Style,
  },
  text::{
    Line,
    Span,
  },
  widgets::Paragraph,
};
use the_lib::{
  editor::Editor,
  keymap::Keymap,
  messages::MessageLevel,
  position::Position,
  selection::Selection,
};
use unicode_width::UnicodeWidthChar;

use crate::{
  ctx::Ctx,
  terminal::Terminal,
};

/// Rows below the text area: the status line and the message line.
const CHROME_HEIGHT: u16 = 2;

/// Screen width of `c` when it starts at display column `x`.
fn char_width(c: char, x: usize, tab_width: usize) -> usize {
  match c {
    '\t' => tab_width.max(1) - x % tab_width.max(1),
    c if c.is_control() => 1,
    c => c.width().unwrap_or(0),
  }
}

/// Display column of char column `col` in `line`.
pub fn visual_col(line: &[char], col: usize, tab_width: usize) -> usize {
  line
    .iter()
    .take(col)
    .fold(0, |x, c| x + char_width(*c, x, tab_width))
}

/// One document line as styled spans, clipped to `[scroll_col, scroll_col +
/// width)` display columns.
pub fn render_line(
  line: &[char],
  row: usize,
  selection: &Selection,
  tab_width: usize,
  scroll_col: usize,
  width: usize,
) -> Line<'static> {
  let selected = Style::default().add_modifier(Modifier::REVERSED);
  let end = scroll_col + width;
  let mut spans: Vec<Span<'static>> = Vec::new();
  let mut run = String::new();
  let mut run_style = Style::default();
  let mut x = 0;

  for (col, c) in line.iter().enumerate() {
    let w = char_width(*c, x, tab_width);
    let start = x;
    x += w;
    if x <= scroll_col || w == 0 {
      continue;
    }
    if start >= end {
      break;
    }

    let style = if selection.contains(Position::new(row, col)) {
      selected
    } else {
      Style::default()
    };
    if style != run_style && !run.is_empty() {
      spans.push(Span::styled(std::mem::take(&mut run), run_style));
    }
    run_style = style;

    // Cells cut off by either edge are padded with spaces.
    let visible = x.min(end) - start.max(scroll_col);
    match c {
      c if *c == '\t' || start < scroll_col || x > end => run.extend(std::iter::repeat_n(' ', visible)),
      c if c.is_control() => run.push('?'),
      c => run.push(*c),
    }
  }

  if !run.is_empty() {
    spans.push(Span::styled(run, run_style));
  }
  Line::from(spans)
}

pub fn status_text(editor: &Editor, width: usize) -> String {
  let buffer = editor.buffer();
  let cursor = buffer.cursor();
  let marker = if buffer.is_modified() { '*' } else { '-' };
  let left = format!(
    " {marker} {}  {} of {}  [{}|{}]",
    buffer.display_name(),
    editor.active_index() + 1,
    editor.buffer_count(),
    cursor.row + 1,
    cursor.col + 1,
  );
  let right = "C-h for help ";
  let used = left.chars().count() + right.len();
  if used >= width {
    return left;
  }
  format!("{left}{}{right}", " ".repeat(width - used))
}

pub fn help_lines(keymap: &Keymap) -> Vec<Line<'static>> {
  let mut lines = vec![
    Line::styled(
      " the-pad key bindings (press any key to return)",
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Line::default(),
  ];
  lines.extend(keymap.entries().map(|(binding, command)| {
    Line::from(format!(" {:>10}  {}", binding.to_string(), command.description()))
  }));
  lines.push(Line::default());
  lines.push(Line::from(" other keys insert themselves"));
  lines
}

/// Render the editor state to the terminal.
pub fn render(ctx: &mut Ctx, terminal: &mut Terminal) -> Result<()> {
  let area = terminal.size()?;
  let text_height = usize::from(area.height.saturating_sub(CHROME_HEIGHT)).max(1);
  let text_width = usize::from(area.width).max(1);
  let tab_width = ctx.config.editor.tab_width;

  ctx.editor.set_page_height(text_height);
  let buffer = ctx.editor.buffer();
  let cursor = buffer.cursor();
  let cursor_x = visual_col(buffer.document().current_line(), cursor.col, tab_width);
  ctx.ensure_cursor_visible(text_height, text_width, cursor_x);

  let ctx = &*ctx;
  terminal.draw(|frame| {
    if ctx.show_help {
      frame.render_widget(Paragraph::new(help_lines(&ctx.keymap)), frame.area());
      return;
    }
    draw_text(frame, ctx, text_height, text_width);
    draw_chrome(frame, ctx);

    let x = cursor_x.saturating_sub(ctx.scroll.col);
    let y = cursor.row.saturating_sub(ctx.scroll.row);
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
      frame.set_cursor_position((x, y));
    }
  })
}

fn draw_text(frame: &mut Frame, ctx: &Ctx, height: usize, width: usize) {
  let buffer = ctx.editor.buffer();
  let document = buffer.document();
  let tab_width = ctx.config.editor.tab_width;

  let lines: Vec<Line> = (ctx.scroll.row..ctx.scroll.row + height)
    .map(|row| {
      match document.line(row) {
        Some(line) => {
          render_line(
            line,
            row,
            buffer.selection(),
            tab_width,
            ctx.scroll.col,
            width,
          )
        },
        None => Line::styled("~", Style::default().fg(Color::DarkGray)),
      }
    })
    .collect();

  let area = frame.area();
  let text_area = Rect::new(
    area.x,
    area.y,
    area.width,
    area.height.saturating_sub(CHROME_HEIGHT),
  );
  frame.render_widget(Paragraph::new(lines), text_area);
}

fn draw_chrome(frame: &mut Frame, ctx: &Ctx) {
  let area = frame.area();
  if area.height < CHROME_HEIGHT {
    return;
  }
  let status_row = Rect::new(area.x, area.bottom() - 2, area.width, 1);
  let message_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);

  let status = status_text(&ctx.editor, usize::from(area.width));
  frame.render_widget(
    Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED)),
    status_row,
  );

  if let Some(message) = ctx.editor.messages().active() {
    let style = match message.level {
      MessageLevel::Info => Style::default(),
      MessageLevel::Warning => Style::default().fg(Color::Yellow),
      MessageLevel::Error => Style::default().fg(Color::Red),
    };
    frame.render_widget(
      Paragraph::new(message.text.clone()).style(style),
      message_row,
    );
  }
}

#[cfg(test)]
mod tests {
  use the_lib::{
    buffer::Buffer,
    document::Document,
  };

  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  fn content(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
  }

  #[test]
  fn tabs_expand_to_the_next_stop() {
    let line = chars("a\tb\tc");
    assert_eq!(visual_col(&line, 1, 4), 1);
    assert_eq!(visual_col(&line, 2, 4), 4);
    assert_eq!(visual_col(&line, 4, 4), 8);
    assert_eq!(visual_col(&chars("日本"), 2, 8), 4);

    let rendered = render_line(&line, 0, &Selection::new(), 4, 0, 80);
    assert_eq!(content(&rendered), "a   b   c");
  }

  #[test]
  fn lines_are_clipped_to_the_view() {
    let line = chars("0123456789");
    let rendered = render_line(&line, 0, &Selection::new(), 8, 3, 4);
    assert_eq!(content(&rendered), "3456");
  }

  #[test]
  fn selection_is_reversed() {
    let line = chars("hello");
    let selection = Selection::with_points(Position::new(0, 1), Position::new(0, 3));
    let rendered = render_line(&line, 0, &selection, 8, 0, 80);
    let styled: Vec<_> = rendered
      .spans
      .iter()
      .map(|span| {
        (
          span.content.to_string(),
          span.style.add_modifier.contains(Modifier::REVERSED),
        )
      })
      .collect();
    assert_eq!(styled, [
      ("h".to_string(), false),
      ("el".to_string(), true),
      ("lo".to_string(), false),
    ]);
  }

  #[test]
  fn status_line_describes_the_buffer() {
    let mut buffer = Buffer::with_document(Document::from_lines(["ab", "cd"]), None);
    buffer.insert_char('x');
    let editor = Editor::with_buffers(vec![buffer, Buffer::new()]);
    let status = status_text(&editor, 60);
    assert!(status.starts_with(" * <no file>  1 of 2  [1|2]"));
    assert!(status.ends_with("C-h for help "));
    assert_eq!(status.chars().count(), 60);
  }

  #[test]
  fn help_lists_bindings() {
    let lines = help_lines(&Keymap::default());
    assert!(
      lines
        .iter()
        .any(|line| content(line).contains("C-z  undo last change"))
    );
  }
}
