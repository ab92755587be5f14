use super::render::{WaveformBar, WaveformStyle};

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One line of block characters, one per bar, scaled between the style's
/// minimum and maximum heights.
pub fn render_bars(bars: &[WaveformBar], style: &WaveformStyle) -> String {
    let span = (style.max_height - style.min_height).max(f32::EPSILON);

    bars.iter()
        .map(|bar| {
            let t = ((bar.height - style.min_height) / span).clamp(0.0, 1.0);
            BLOCKS[(t * (BLOCKS.len() - 1) as f32).round() as usize]
        })
        .collect()
}
