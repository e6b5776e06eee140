use crate::errors::AppResult;
use crate::export::Exporter;
use crate::models::attendance::AttendanceEvent;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

/// Title line of the logbook PDF for one date.
pub fn pdf_title(label: &str) -> String {
    format!("Schüler-Logbuch für {label}")
}

/// Encode for the WinAnsi-encoded base font. Only printable ASCII and
/// U+00A0..=U+00FF map to themselves; C0/C1 controls and anything wider become '?'.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Text-line PDF writer: a title on every page, then one line per entry,
/// continuing on new A4 pages as needed.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,

    page_w: f32,
    page_h: f32,
    margin: f32,
    line_h: f32,

    font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            next_id: 4,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            line_h: 22.0,

            font_size: 12.0,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn draw_text(content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&latin1(text)));
        content.end_text();
    }

    /// Rough Helvetica width, good enough for centering a title.
    fn approx_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn lines_per_page(&self) -> usize {
        let usable = self.page_h - 2.0 * self.margin - 2.0 * self.line_h;
        ((usable / self.line_h).floor() as usize).max(1)
    }

    fn write_page(&mut self, title: &str, lines: &[String]) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(content_id);
            page.resources().fonts().pair(Name(b"F1"), self.font_id);
        }

        let mut content = Content::new();

        let title_x = ((self.page_w - self.approx_width(title, self.title_font_size)) / 2.0)
            .max(self.margin);
        let mut y = self.page_h - self.margin;
        Self::draw_text(&mut content, title_x, y, self.title_font_size, title);

        // blank line under the title
        y -= 2.0 * self.line_h;

        for line in lines {
            Self::draw_text(&mut content, self.margin, y, self.font_size, line);
            y -= self.line_h;
        }

        self.pdf.stream(content_id, &content.finish());
    }

    /// Lay out `lines` under `title`. An empty list still yields one page.
    pub fn write_lines(&mut self, title: &str, lines: &[String]) {
        if lines.is_empty() {
            self.write_page(title, &[]);
            return;
        }

        let per_page = self.lines_per_page();
        for chunk in lines.chunks(per_page) {
            self.write_page(title, chunk);
        }
    }

    #[cfg(test)]
    fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);

        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .count(count)
            .kids(self.page_refs.iter().copied());

        self.pdf.finish()
    }
}

pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn render(&self, events: &[AttendanceEvent], label: &str) -> AppResult<Vec<u8>> {
        let lines: Vec<String> = events.iter().map(AttendanceEvent::logbook_line).collect();

        let mut pdf = PdfManager::new();
        pdf.write_lines(&pdf_title(label), &lines);
        Ok(pdf.finish())
    }
}
