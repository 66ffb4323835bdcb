// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Temporal/feedback effects: accumulators, freeze frames, and bounded
//! frame histories. All buffers here are lazily sized on the first
//! processed frame and persist across calls.

use std::collections::VecDeque;

use crate::frame::Frame;

use super::support;

/// Portion of the accumulator kept per tick at full intensity.
const FEEDBACK_DECAY: f32 = 0.95;

/// Maximum number of frames retained by the slit-scan history.
const SLIT_SCAN_CAPACITY: usize = 60;

/// Feedback accumulator, stored as f32 so repeated blending does not
/// accumulate quantization error.
#[derive(Debug, Default)]
pub struct FeedbackState {
    buffer: Option<Vec<f32>>,
}

/// Blends the input into a persistent accumulator. Higher intensity keeps
/// more of the accumulator (longer memory); intensity zero passes the
/// input straight through. A small wrapping horizontal shift of the
/// accumulator produces the smear.
pub fn feedback(state: &mut FeedbackState, frame: &Frame, intensity: f32) -> Frame {
    let width = frame.width() as usize;
    let input = frame.to_f32();

    let buffer = match &mut state.buffer {
        Some(buffer) if buffer.len() == input.len() => buffer,
        _ => {
            // First frame (or a dimension change): seed the accumulator and
            // return the input unchanged, since there is no prior state to
            // blend with.
            state.buffer = Some(input);
            return frame.clone();
        }
    };

    let keep = FEEDBACK_DECAY * intensity;
    for (acc, cur) in buffer.iter_mut().zip(input.iter()) {
        *acc = *acc * keep + *cur * (1.0 - keep);
    }

    let shift = (2.0 * intensity) as i64;
    if shift > 0 {
        support::roll_rgb_rows(buffer, width, shift);
    }

    Frame::from_f32(frame.width(), frame.height(), buffer)
}

/// Per-channel trail caches for the RGB split.
#[derive(Debug, Default)]
pub struct RgbSplitState {
    channels: Option<[Vec<f32>; 3]>,
}

/// Splits the channels with opposing horizontal offsets (chromatic
/// aberration) and runs an exponential trail on each channel
/// independently.
pub fn rgb_split(state: &mut RgbSplitState, frame: &Frame, intensity: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let data = frame.data();

    let mut shifted: [Vec<f32>; 3] = [
        Vec::with_capacity(width * height),
        Vec::with_capacity(width * height),
        Vec::with_capacity(width * height),
    ];
    for (c, plane) in shifted.iter_mut().enumerate() {
        plane.extend(data.chunks_exact(3).map(|p| p[c] as f32));
    }

    let offset = (10.0 * intensity) as i64;
    support::roll_plane_rows(&mut shifted[0], width, offset);
    support::roll_plane_rows(&mut shifted[2], width, -offset);

    let trail = 0.3 * intensity;
    if state
        .channels
        .as_ref()
        .map_or(false, |c| c[0].len() != width * height)
    {
        // Dimension change invalidates the trails.
        state.channels = None;
    }
    let channels = state.channels.get_or_insert_with(|| shifted.clone());

    let mut out = vec![0.0f32; width * height * 3];
    for c in 0..3 {
        for (i, cur) in shifted[c].iter().enumerate() {
            channels[c][i] = channels[c][i] * trail + cur * (1.0 - trail);
            out[i * 3 + c] = channels[c][i];
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &out)
}

/// Held frame and tick counter for the strobe.
#[derive(Debug, Default)]
pub struct StrobeState {
    held: Option<Frame>,
    ticks: u32,
}

/// Freeze-frame strobe: output is re-captured only when the tick counter
/// exceeds the current freeze duration, which shrinks as intensity rises
/// (more frequent freezes). Until the first capture the input passes
/// through.
///
/// This effect holds stale frames by design, so its zero-intensity output
/// can lag a changing input by up to the freeze duration.
pub fn strobe(state: &mut StrobeState, frame: &Frame, intensity: f32) -> Frame {
    let frequency = 5.0 + intensity * 15.0;
    let freeze_duration = (30.0 / frequency) as u32;

    state.ticks += 1;
    if state.ticks > freeze_duration {
        state.held = Some(frame.clone());
        state.ticks = 0;
    }

    match &state.held {
        Some(held) if held.width() == frame.width() && held.height() == frame.height() => {
            held.clone()
        }
        _ => frame.clone(),
    }
}

/// Bounded FIFO of recent frames for the slit scan.
#[derive(Debug, Default)]
pub struct SlitScanState {
    history: VecDeque<Frame>,
}

/// Slit-scan time displacement: the output is partitioned into horizontal
/// bands, each sourced from a different historical frame (oldest at the
/// top) and blended with the current frame by intensity. Every row maps to
/// a band, so a short history never produces unassigned rows.
pub fn slit_scan(state: &mut SlitScanState, frame: &Frame, intensity: f32) -> Frame {
    if state
        .history
        .front()
        .is_some_and(|f| f.width() != frame.width() || f.height() != frame.height())
    {
        state.history.clear();
    }

    state.history.push_back(frame.clone());
    if state.history.len() > SLIT_SCAN_CAPACITY {
        state.history.pop_front();
    }

    if state.history.len() < 2 {
        return frame.clone();
    }

    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let band_height = (height / state.history.len()).max(1);

    let mut out = frame.clone();
    for y in 0..height {
        let band = (y / band_height).min(state.history.len() - 1);
        let historical = &state.history[band];

        let row_start = y * width * 3;
        let row_end = row_start + width * 3;
        let current_row = &frame.data()[row_start..row_end];
        let historical_row = &historical.data()[row_start..row_end];
        let out_row = &mut out.data_mut()[row_start..row_end];

        for i in 0..out_row.len() {
            let blended =
                historical_row[i] as f32 * intensity + current_row[i] as f32 * (1.0 - intensity);
            out_row[i] = blended.clamp(0.0, 255.0).round() as u8;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_first_tick_is_identity() {
        let mut state = FeedbackState::default();
        let frame = Frame::filled(8, 8, [50, 100, 150]).unwrap();
        let out = feedback(&mut state, &frame, 0.8);
        assert_eq!(out, frame);
        assert!(state.buffer.is_some());
    }

    #[test]
    fn test_feedback_converges_under_constant_input() {
        let mut state = FeedbackState::default();
        let frame = Frame::filled(8, 8, [200, 10, 10]).unwrap();

        let mut previous = feedback(&mut state, &frame, 0.9);
        let mut converged = false;
        for _ in 0..200 {
            let next = feedback(&mut state, &frame, 0.9);
            if next == previous {
                converged = true;
                break;
            }
            previous = next;
        }
        assert!(converged, "feedback did not settle under constant input");
    }

    #[test]
    fn test_feedback_zero_intensity_tracks_input() {
        let mut state = FeedbackState::default();
        let first = Frame::filled(4, 4, [0, 0, 0]).unwrap();
        let second = Frame::filled(4, 4, [99, 99, 99]).unwrap();

        feedback(&mut state, &first, 0.0);
        let out = feedback(&mut state, &second, 0.0);
        assert_eq!(out, second);
    }

    #[test]
    fn test_strobe_bootstrap_passthrough() {
        let mut state = StrobeState::default();
        let frame = Frame::filled(4, 4, [1, 2, 3]).unwrap();
        let out = strobe(&mut state, &frame, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_strobe_holds_captured_frame() {
        let mut state = StrobeState::default();
        let first = Frame::filled(4, 4, [10, 10, 10]).unwrap();
        let second = Frame::filled(4, 4, [200, 200, 200]).unwrap();

        // At intensity 1 the freeze duration is 30/20 = 1 tick, so the
        // second tick captures.
        strobe(&mut state, &first, 1.0);
        strobe(&mut state, &first, 1.0);
        let out = strobe(&mut state, &second, 1.0);
        assert_eq!(out.pixel(0, 0), [10, 10, 10]);
    }

    #[test]
    fn test_slit_scan_bootstrap_passthrough() {
        let mut state = SlitScanState::default();
        let frame = Frame::filled(6, 6, [80, 90, 100]).unwrap();
        // One frame of history is not enough to scan.
        let out = slit_scan(&mut state, &frame, 1.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_slit_scan_bands_pull_from_history() {
        let mut state = SlitScanState::default();
        let dark = Frame::filled(4, 8, [0, 0, 0]).unwrap();
        let bright = Frame::filled(4, 8, [255, 255, 255]).unwrap();

        slit_scan(&mut state, &dark, 1.0);
        let out = slit_scan(&mut state, &bright, 1.0);

        // Two history frames: the top half comes from the dark frame, the
        // bottom half from the bright one.
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
        assert_eq!(out.pixel(0, 7), [255, 255, 255]);
    }

    #[test]
    fn test_slit_scan_history_is_bounded() {
        let mut state = SlitScanState::default();
        let frame = Frame::filled(4, 4, [7, 7, 7]).unwrap();
        for _ in 0..(SLIT_SCAN_CAPACITY + 20) {
            slit_scan(&mut state, &frame, 0.5);
        }
        assert_eq!(state.history.len(), SLIT_SCAN_CAPACITY);
    }

    #[test]
    fn test_rgb_split_zero_intensity_is_identity() {
        let mut state = RgbSplitState::default();
        let frame = Frame::filled(8, 4, [12, 34, 56]).unwrap();
        let out = rgb_split(&mut state, &frame, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_rgb_split_offsets_channels() {
        let mut state = RgbSplitState::default();
        let mut frame = Frame::filled(16, 1, [0, 0, 0]).unwrap();
        frame.put_pixel(8, 0, [255, 255, 255]);

        let out = rgb_split(&mut state, &frame, 1.0);
        // Red moves right by 10, blue moves left by 10 (wrapping), green
        // stays.
        assert_eq!(out.pixel(2, 0)[0], 255);
        assert_eq!(out.pixel(8, 0)[1], 255);
        assert_eq!(out.pixel(14, 0)[2], 255);
    }
}
