//! Screenshots: the current frame as a structured document.
//!
//! A handler returning [`Response::Screenshot`](crate::Response::Screenshot)
//! asks the scheduler to hand a [`FrameDocument`] to its [`ScreenshotSink`].
//! Exporters (SVG, HTML, plain text) live outside the crate and consume the
//! document.

use crate::buffer::{CellStyle, Frame};

/// A run of adjacent cells in one row sharing a style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// Starting column.
    pub x: u16,
    /// Characters of the run; wide characters appear once.
    pub text: String,
    /// Shared style.
    pub style: CellStyle,
}

/// A frame as rows of styled runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDocument {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
    /// One entry per row.
    pub rows: Vec<Vec<StyledRun>>,
}

impl FrameDocument {
    /// Capture `frame`.
    pub fn from_frame(frame: &Frame) -> Self {
        let rows = frame
            .rows()
            .take(frame.height() as usize)
            .map(|row| {
                let mut runs: Vec<StyledRun> = Vec::new();
                for (x, cell) in row.iter().enumerate() {
                    if cell.is_wide_continuation() {
                        continue;
                    }
                    match runs.last_mut() {
                        Some(run) if run.style == cell.style() => run.text.push(cell.ch()),
                        _ => runs.push(StyledRun {
                            x: x as u16,
                            text: cell.ch().to_string(),
                            style: cell.style(),
                        }),
                    }
                }
                runs
            })
            .collect();
        Self {
            width: frame.width(),
            height: frame.height(),
            rows,
        }
    }

    /// The characters of the document, one line per row.
    pub fn to_plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Receives screenshots.
pub trait ScreenshotSink {
    /// Called with the most recently emitted frame.
    fn capture(&mut self, document: FrameDocument);
}

impl<F: FnMut(FrameDocument)> ScreenshotSink for F {
    fn capture(&mut self, document: FrameDocument) {
        self(document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::layout::Rect;

    #[test]
    fn test_runs_split_on_style() {
        let mut frame = Frame::new(6, 2);
        let red = CellStyle {
            fg: Some(Rgb::new(255, 0, 0)),
            ..CellStyle::DEFAULT
        };
        frame.draw_str(0, 0, "ab", CellStyle::DEFAULT, frame.area());
        frame.draw_str(2, 0, "日c", red, Rect::new(0, 0, 6, 2));
        let doc = FrameDocument::from_frame(&frame);
        assert_eq!(doc.rows[0].len(), 3);
        assert_eq!(doc.rows[0][1].text, "日c");
        assert_eq!(doc.rows[0][1].x, 2);
        assert_eq!(doc.rows[0][2].x, 5);
        assert_eq!(doc.to_plain_text(), frame.to_text());
    }

    #[test]
    fn test_closure_sink() {
        let mut captured = Vec::new();
        {
            let mut sink = |doc: FrameDocument| captured.push(doc.width);
            sink.capture(FrameDocument::from_frame(&Frame::new(3, 1)));
        }
        assert_eq!(captured, vec![3]);
    }
}
