use serde::{Deserialize, Serialize};

use super::canvas::OverlayCanvas;
use super::geometry::{frame_index, Rect, Scale, Size};
use crate::models::AnnotationSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    pub box_color: String,
    pub line_width: f64,
    pub chip_color: String,
    pub text_color: String,
    pub font: String,
    pub chip_height: f64,
    pub chip_padding: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: "#00ff66".into(),
            line_width: 2.0,
            chip_color: "rgba(0, 0, 0, 0.7)".into(),
            text_color: "#ffffff".into(),
            font: "14px sans-serif".into(),
            chip_height: 20.0,
            chip_padding: 4.0,
        }
    }
}

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub time_secs: f64,
    pub fps: f64,
    pub annotations: &'a AnnotationSet,
    pub show_annotations: bool,
    pub paused: bool,
    pub video_size: Option<Size>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Hidden,
    NoAnnotations,
    Paused,
    InvalidTime,
    NoFrameMatch,
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Cleared(ClearReason),
    Drew(usize),
}

/// Draws the annotations of the frame under `time_secs`. The canvas is
/// cleared on every call, so nothing stale survives a pause or a miss.
pub fn render_overlay(
    frame: &OverlayFrame<'_>,
    style: &OverlayStyle,
    canvas: &mut dyn OverlayCanvas,
) -> RenderOutcome {
    canvas.clear();

    if !frame.show_annotations {
        return RenderOutcome::Cleared(ClearReason::Hidden);
    }
    if frame.annotations.is_empty() {
        return RenderOutcome::Cleared(ClearReason::NoAnnotations);
    }
    if frame.paused {
        return RenderOutcome::Cleared(ClearReason::Paused);
    }

    let Some(current) = frame_index(frame.time_secs, frame.fps) else {
        return RenderOutcome::Cleared(ClearReason::InvalidTime);
    };

    let matched = frame.annotations.at_frame(current);
    if matched.is_empty() {
        return RenderOutcome::Cleared(ClearReason::NoFrameMatch);
    }

    let canvas_size = canvas.size();
    let Some(scale) = frame
        .video_size
        .and_then(|video| Scale::between(video, canvas_size))
    else {
        return RenderOutcome::Cleared(ClearReason::NotReady);
    };

    for annotation in matched {
        let rect = scale.map_box(&annotation.bbox);
        canvas.stroke_rect(rect, &style.box_color, style.line_width);

        let label = annotation.label();
        let text_width = canvas.measure_text(&label, &style.font);
        let chip = label_chip(rect, text_width, style, canvas_size);
        canvas.fill_rect(chip, &style.chip_color);
        canvas.fill_text(
            &label,
            chip.x + style.chip_padding,
            chip.bottom() - style.chip_padding,
            &style.text_color,
            &style.font,
        );
    }

    RenderOutcome::Drew(matched.len())
}

/// Chip sits directly above the box's top-left corner. It drops inside the
/// box when there is no room above and shifts left to stay on the canvas.
pub fn label_chip(rect: Rect, text_width: f64, style: &OverlayStyle, canvas: Size) -> Rect {
    let width = text_width + style.chip_padding * 2.0;
    let height = style.chip_height;

    let mut y = rect.y - height;
    if y < 0.0 {
        y = rect.y.max(0.0);
    }

    let mut x = rect.x;
    if x + width > canvas.width {
        x = canvas.width - width;
    }

    Rect::new(x.max(0.0), y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Annotation, BoundingBox};
    use crate::overlay::canvas::{DrawCommand, RecordingCanvas};

    fn set() -> AnnotationSet {
        AnnotationSet::for_clip(
            "v1",
            vec![
                Annotation::new(30, BoundingBox::new(10.0, 10.0, 50.0, 50.0), "cat", 0.912),
                Annotation::new(31, BoundingBox::new(600.0, 100.0, 640.0, 200.0), "bird", 0.5),
            ],
        )
    }

    fn frame(annotations: &AnnotationSet, time_secs: f64) -> OverlayFrame<'_> {
        OverlayFrame {
            time_secs,
            fps: 30.0,
            annotations,
            show_annotations: true,
            paused: false,
            video_size: Some(Size::new(640.0, 480.0)),
        }
    }

    #[test]
    fn scales_box_to_canvas() {
        let annotations = set();
        let mut canvas = RecordingCanvas::new(Size::new(800.0, 600.0));

        let outcome = render_overlay(&frame(&annotations, 1.0), &OverlayStyle::default(), &mut canvas);

        assert_eq!(outcome, RenderOutcome::Drew(1));
        let boxes = canvas.visible_boxes();
        assert_eq!(boxes, [Rect::new(12.5, 12.5, 50.0, 50.0)]);
        assert_eq!((boxes[0].right(), boxes[0].bottom()), (62.5, 62.5));
        assert_eq!(canvas.visible_labels(), ["cat 91.2%"]);
    }

    #[test]
    fn draws_nothing_when_hidden_empty_paused_or_unmatched() {
        let annotations = set();
        let empty = AnnotationSet::empty();
        let style = OverlayStyle::default();
        let mut canvas = RecordingCanvas::new(Size::new(800.0, 600.0));

        let hidden = OverlayFrame {
            show_annotations: false,
            ..frame(&annotations, 1.0)
        };
        let paused = OverlayFrame {
            paused: true,
            ..frame(&annotations, 1.0)
        };
        let cases = [
            (hidden, ClearReason::Hidden),
            (frame(&empty, 1.0), ClearReason::NoAnnotations),
            (paused, ClearReason::Paused),
            (frame(&annotations, 1.1), ClearReason::NoFrameMatch),
            (frame(&annotations, -1.0), ClearReason::InvalidTime),
        ];

        for (input, reason) in cases {
            assert_eq!(
                render_overlay(&input, &style, &mut canvas),
                RenderOutcome::Cleared(reason)
            );
            assert!(canvas.visible_boxes().is_empty());
        }
    }

    #[test]
    fn unknown_intrinsic_size_skips_drawing() {
        let annotations = set();
        let mut canvas = RecordingCanvas::new(Size::new(800.0, 600.0));
        let input = OverlayFrame {
            video_size: Some(Size::new(0.0, 0.0)),
            ..frame(&annotations, 1.0)
        };

        let outcome = render_overlay(&input, &OverlayStyle::default(), &mut canvas);

        assert_eq!(outcome, RenderOutcome::Cleared(ClearReason::NotReady));
        assert_eq!(canvas.commands(), [DrawCommand::Clear]);
    }

    #[test]
    fn stale_boxes_are_cleared_on_the_next_miss() {
        let annotations = set();
        let style = OverlayStyle::default();
        let mut canvas = RecordingCanvas::new(Size::new(640.0, 480.0));

        render_overlay(&frame(&annotations, 1.0), &style, &mut canvas);
        assert_eq!(canvas.visible_boxes().len(), 1);

        render_overlay(&frame(&annotations, 2.0), &style, &mut canvas);
        assert!(canvas.visible_boxes().is_empty());
    }

    #[test]
    fn chip_stays_on_canvas() {
        let style = OverlayStyle::default();
        let canvas = Size::new(640.0, 480.0);

        let above = label_chip(Rect::new(100.0, 100.0, 40.0, 40.0), 50.0, &style, canvas);
        assert_eq!(above, Rect::new(100.0, 80.0, 58.0, 20.0));

        let at_top = label_chip(Rect::new(100.0, 5.0, 40.0, 40.0), 50.0, &style, canvas);
        assert_eq!(at_top.y, 5.0);

        let at_right = label_chip(Rect::new(620.0, 100.0, 20.0, 40.0), 50.0, &style, canvas);
        assert_eq!(at_right.right(), 640.0);
    }
}
