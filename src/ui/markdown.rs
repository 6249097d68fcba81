//! Assistant replies arrive as markdown. This turns them into styled,
//! width-wrapped lines: headings, emphasis, lists, quotes, code and tables.

use std::mem;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles;

const BULLET: &str = "• ";
const QUOTE_BAR: &str = "│ ";
const CODE_BAR: &str = "│ ";
const LIST_INDENT: &str = "  ";

/// Renders `text` into lines no wider than `width` columns where wrapping
/// applies. Code blocks and tables keep their layout and are clipped by the
/// caller's widget instead.
pub fn render(text: &str, width: usize) -> Vec<Line<'static>> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut renderer = Renderer::new(width.max(1));

    for event in Parser::new_ext(text, options) {
        renderer.handle(event);
    }

    renderer.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading,
    List,
    Item,
    CodeBlock,
    Quote,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Inline,
    Other,
}

#[derive(Debug, Clone)]
struct Segment {
    text: String,
    style: Style,
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    style: Style,
    gap: bool,
}

#[derive(Debug, Clone, Default)]
struct Prefix {
    text: String,
    style: Style,
}

impl Prefix {
    fn width(&self) -> usize {
        self.text.width()
    }
}

#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

struct Renderer {
    width: usize,
    lines: Vec<Line<'static>>,
    open: Vec<Open>,
    modifiers: Vec<Modifier>,
    segments: Vec<Segment>,
    heading: Option<u8>,
    marker: Option<String>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    table: Option<TableBuffer>,
    gap: bool,
}

impl Renderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            open: Vec::new(),
            modifiers: Vec::new(),
            segments: Vec::new(),
            heading: None,
            marker: None,
            lists: Vec::new(),
            quote_depth: 0,
            table: None,
            gap: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                if let Some(open) = self.open.pop() {
                    self.end(open);
                }
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.begin_block();
                let rule = "─".repeat(self.width.saturating_sub(self.lead().width()).max(1));
                self.lines.push(Line::from(vec![
                    Span::raw(self.lead()),
                    Span::styled(rule, styles::markdown_rule_style()),
                ]));
                self.end_block();
            }
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                self.flush();
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(heading_rank(level));
                Open::Heading
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
                Open::List
            }
            Tag::Item => {
                self.flush();
                self.marker = Some(self.next_marker());
                Open::Item
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.begin_block();
                Open::CodeBlock
            }
            Tag::BlockQuote(..) => {
                self.flush();
                self.quote_depth += 1;
                Open::Quote
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuffer::default());
                Open::Table
            }
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
                Open::TableCell
            }
            Tag::Strong => {
                self.modifiers.push(Modifier::BOLD);
                Open::Inline
            }
            Tag::Emphasis => {
                self.modifiers.push(Modifier::ITALIC);
                Open::Inline
            }
            Tag::Strikethrough => {
                self.modifiers.push(Modifier::CROSSED_OUT);
                Open::Inline
            }
            Tag::Link { .. } => {
                self.modifiers.push(Modifier::UNDERLINED);
                Open::Inline
            }
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self, open: Open) {
        match open {
            Open::Paragraph => {
                self.flush();
                self.end_block();
            }
            Open::Heading => {
                self.flush();
                self.heading = None;
                self.end_block();
            }
            Open::List => {
                self.flush();
                self.lists.pop();
                self.end_block();
            }
            Open::Item => {
                self.flush();
                self.marker = None;
            }
            Open::CodeBlock => self.end_block(),
            Open::Quote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.end_block();
            }
            Open::Table => {
                if let Some(table) = self.table.take() {
                    self.begin_block();
                    let lead = self.lead();
                    self.lines.extend(table_lines(&table, &lead));
                    self.end_block();
                }
            }
            Open::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = mem::take(&mut table.row);
                }
            }
            Open::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            Open::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = mem::take(&mut table.cell).trim().to_owned();
                    table.row.push(cell);
                }
            }
            Open::Inline => {
                self.modifiers.pop();
            }
            Open::Other => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.open.contains(&Open::CodeBlock) {
            let lead = self.lead();
            for row in text.lines() {
                self.lines.push(Line::from(vec![
                    Span::raw(lead.clone()),
                    Span::styled(CODE_BAR, styles::markdown_rule_style()),
                    Span::styled(row.to_owned(), styles::markdown_code_style()),
                ]));
            }
            return;
        }

        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
            return;
        }

        self.segments.push(Segment {
            text: text.to_owned(),
            style: self.current_style(),
        });
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(code);
            return;
        }

        self.segments.push(Segment {
            text: code.to_owned(),
            style: styles::markdown_code_style(),
        });
    }

    fn current_style(&self) -> Style {
        let base = match self.heading {
            Some(rank) => styles::markdown_heading_style(rank),
            None if self.quote_depth > 0 => styles::markdown_quote_style(),
            None => styles::markdown_text_style(),
        };
        self.modifiers
            .iter()
            .fold(base, |style, modifier| style.add_modifier(*modifier))
    }

    fn next_marker(&mut self) -> String {
        match self.lists.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{number}. ");
                *number += 1;
                marker
            }
            _ => BULLET.to_owned(),
        }
    }

    /// Quote bars and nesting indent shared by every line of the current block.
    fn lead(&self) -> String {
        let mut lead = QUOTE_BAR.repeat(self.quote_depth);
        lead.push_str(&LIST_INDENT.repeat(self.lists.len().saturating_sub(1)));
        lead
    }

    fn begin_block(&mut self) {
        if self.gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.gap = false;
    }

    /// List items sit tight; everything else is separated by a blank line.
    fn end_block(&mut self) {
        if self.lists.is_empty() {
            self.gap = true;
        }
    }

    fn flush(&mut self) {
        if self.segments.iter().all(|segment| segment.text.trim().is_empty()) {
            self.segments.clear();
            return;
        }

        self.begin_block();
        let lead = self.lead();
        let prefix_style = if self.quote_depth > 0 {
            styles::markdown_quote_style()
        } else {
            styles::markdown_bullet_style()
        };
        let (first, rest) = match self.marker.take() {
            Some(marker) => {
                let rest = format!("{lead}{}", " ".repeat(marker.width()));
                (format!("{lead}{marker}"), rest)
            }
            None if !self.lists.is_empty() => {
                let indented = format!("{lead}{LIST_INDENT}");
                (indented.clone(), indented)
            }
            None => (lead.clone(), lead),
        };

        let segments = mem::take(&mut self.segments);
        self.lines.extend(wrap_segments(
            &segments,
            &Prefix {
                text: first,
                style: prefix_style,
            },
            &Prefix {
                text: rest,
                style: prefix_style,
            },
            self.width,
        ));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}

fn split_words(segments: &[Segment]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut gap = false;

    for segment in segments {
        let mut current = String::new();
        for ch in segment.text.chars() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(Word {
                        text: mem::take(&mut current),
                        style: segment.style,
                        gap,
                    });
                    gap = false;
                }
                gap = true;
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            words.push(Word {
                text: current,
                style: segment.style,
                gap,
            });
            gap = false;
        }
    }

    words
}

/// Greedy wrap across differently styled segments. Words with no whitespace
/// between them stay glued; words wider than a row are split.
fn wrap_segments(
    segments: &[Segment],
    first: &Prefix,
    rest: &Prefix,
    width: usize,
) -> Vec<Line<'static>> {
    let limit = |row: usize| {
        let prefix = if row == 0 { first } else { rest };
        width.saturating_sub(prefix.width()).max(1)
    };
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut row_width = 0;

    for word in split_words(segments) {
        let word_width = word.text.width();
        let separator = usize::from(word.gap && row_width > 0);

        if row_width + separator + word_width <= limit(rows.len() - 1) {
            if let Some(row) = rows.last_mut() {
                if separator == 1 {
                    row.push(Span::raw(" "));
                }
                row.push(Span::styled(word.text, word.style));
            }
            row_width += separator + word_width;
            continue;
        }

        if row_width > 0 {
            rows.push(Vec::new());
            row_width = 0;
        }

        let mut chunk = String::new();
        for ch in word.text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > limit(rows.len() - 1) && row_width > 0 {
                if let Some(row) = rows.last_mut() {
                    row.push(Span::styled(mem::take(&mut chunk), word.style));
                }
                rows.push(Vec::new());
                row_width = 0;
            }
            chunk.push(ch);
            row_width += ch_width;
        }
        if !chunk.is_empty() {
            if let Some(row) = rows.last_mut() {
                row.push(Span::styled(chunk, word.style));
            }
        }
    }

    rows.into_iter()
        .enumerate()
        .map(|(index, spans)| {
            let prefix = if index == 0 { first } else { rest };
            let mut line = Vec::with_capacity(spans.len() + 1);
            if !prefix.text.is_empty() {
                line.push(Span::styled(prefix.text.clone(), prefix.style));
            }
            line.extend(spans);
            Line::from(line)
        })
        .collect()
}

fn table_lines(table: &TableBuffer, lead: &str) -> Vec<Line<'static>> {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![0; columns];
    for row in std::iter::once(&table.header).chain(table.rows.iter()) {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.width());
        }
    }

    let format_row = |row: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map(String::as_str).unwrap_or("");
                let padding = width.saturating_sub(cell.width());
                format!("{cell}{}", " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_owned()
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    if !table.header.is_empty() {
        lines.push(Line::from(vec![
            Span::raw(lead.to_owned()),
            Span::styled(format_row(table.header.as_slice()), styles::markdown_table_header_style()),
        ]));
        let separator = widths
            .iter()
            .map(|width| "─".repeat(*width))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(vec![
            Span::raw(lead.to_owned()),
            Span::styled(separator, styles::markdown_rule_style()),
        ]));
    }
    for row in &table.rows {
        lines.push(Line::from(vec![
            Span::raw(lead.to_owned()),
            Span::styled(format_row(row.as_slice()), styles::markdown_text_style()),
        ]));
    }

    lines
}
