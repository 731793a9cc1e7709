// ABOUTME: Pairs frames from several pose sources into ensemble inputs by timestamp proximity
// ABOUTME: Offline pairing for recorded streams and a latest-frame pairer for live sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::engine::FrameInput;
use pierre_movement_core::models::RawPoseFrame;
use std::collections::VecDeque;

/// Pair recorded streams, the first non-empty one acting as the anchor
///
/// Each anchor frame takes the nearest unused frame of every other stream
/// within `window_ms`. Frames of other streams that never pair are dropped:
/// they are redundant measurements of instants the anchor did not capture.
#[must_use]
pub fn pair_frames(streams: Vec<Vec<RawPoseFrame>>, window_ms: u64) -> Vec<FrameInput> {
    let mut streams: Vec<VecDeque<RawPoseFrame>> = streams
        .into_iter()
        .filter(|stream| !stream.is_empty())
        .map(VecDeque::from)
        .collect();
    if streams.is_empty() {
        return Vec::new();
    }
    let anchor = streams.remove(0);

    anchor
        .into_iter()
        .map(|frame| {
            let partners: Vec<RawPoseFrame> = streams
                .iter_mut()
                .filter_map(|stream| take_nearest(stream, frame.timestamp_ms, window_ms))
                .collect();
            if partners.is_empty() {
                FrameInput::Single(frame)
            } else {
                let mut frames = Vec::with_capacity(partners.len() + 1);
                frames.push(frame);
                frames.extend(partners);
                FrameInput::Ensemble(frames)
            }
        })
        .collect()
}

/// Remove and return the frame nearest `timestamp_ms` within the window,
/// discarding older frames that can no longer pair
fn take_nearest(stream: &mut VecDeque<RawPoseFrame>, timestamp_ms: u64, window_ms: u64) -> Option<RawPoseFrame> {
    while stream
        .front()
        .is_some_and(|frame| frame.timestamp_ms.saturating_add(window_ms) < timestamp_ms)
    {
        stream.pop_front();
    }

    let distance = |frame: &RawPoseFrame| frame.timestamp_ms.abs_diff(timestamp_ms);
    let mut best: Option<(usize, u64)> = None;
    for (index, frame) in stream.iter().enumerate() {
        let gap = distance(frame);
        if frame.timestamp_ms > timestamp_ms.saturating_add(window_ms) {
            break;
        }
        if best.map_or(true, |(_, best_gap)| gap < best_gap) {
            best = Some((index, gap));
        }
    }

    let (index, _) = best?;
    stream.drain(..index);
    stream.pop_front()
}

/// Latest-frame pairing for live sessions
///
/// Holds at most one pending frame per source. The anchor is the first source
/// still producing; an anchor frame is released together with whatever
/// partner frames are pending within the window.
#[derive(Debug)]
pub struct LivePairer {
    window_ms: u64,
    pending: Vec<Option<RawPoseFrame>>,
    dropped: u64,
}

impl LivePairer {
    /// Pairer over `sources` pose sources
    #[must_use]
    pub fn new(sources: usize, window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: vec![None; sources],
            dropped: 0,
        }
    }

    /// Frames replaced or discarded without being analyzed
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// True while a frame from source `index` waits to be released
    #[must_use]
    pub fn has_pending(&self, index: usize) -> bool {
        self.pending.get(index).is_some_and(Option::is_some)
    }

    /// True when no frame waits to be released
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.iter().all(Option::is_none)
    }

    /// Offer a frame from source `index`, replacing any older pending frame
    pub fn offer(&mut self, index: usize, frame: RawPoseFrame) {
        if let Some(slot) = self.pending.get_mut(index) {
            if slot.replace(frame).is_some() {
                self.dropped += 1;
            }
        }
    }

    /// Release the next input, given which sources are still open
    pub fn take_ready(&mut self, open: &[bool]) -> Option<FrameInput> {
        let anchor_index = (0..self.pending.len()).find(|index| {
            open.get(*index).copied().unwrap_or(false) || self.pending[*index].is_some()
        })?;
        let anchor = self.pending[anchor_index].take()?;

        let mut partners = Vec::new();
        for (index, slot) in self.pending.iter_mut().enumerate() {
            if index == anchor_index {
                continue;
            }
            let Some(candidate) = slot.as_ref() else {
                continue;
            };
            if candidate.timestamp_ms.abs_diff(anchor.timestamp_ms) <= self.window_ms {
                partners.extend(slot.take());
            } else if candidate.timestamp_ms < anchor.timestamp_ms {
                slot.take();
                self.dropped += 1;
            }
        }

        Some(if partners.is_empty() {
            FrameInput::Single(anchor)
        } else {
            let mut frames = Vec::with_capacity(partners.len() + 1);
            frames.push(anchor);
            frames.extend(partners);
            FrameInput::Ensemble(frames)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn frame(source: &str, timestamp_ms: u64) -> RawPoseFrame {
        RawPoseFrame {
            source: source.into(),
            timestamp_ms,
            keypoints: Vec::new(),
            coordinates: Default::default(),
        }
    }

    #[test]
    fn test_offline_pairing_takes_nearest_within_window() {
        let inputs = pair_frames(
            vec![
                vec![frame("primary", 0), frame("primary", 100), frame("primary", 200)],
                vec![frame("secondary", 40), frame("secondary", 90), frame("secondary", 500)],
            ],
            50,
        );
        assert_eq!(inputs.len(), 3);
        assert!(matches!(&inputs[0], FrameInput::Ensemble(frames) if frames[1].timestamp_ms == 40));
        assert!(matches!(&inputs[1], FrameInput::Ensemble(frames) if frames[1].timestamp_ms == 90));
        assert!(matches!(&inputs[2], FrameInput::Single(_)));
    }

    #[test]
    fn test_empty_anchor_promotes_next_stream() {
        let inputs = pair_frames(vec![Vec::new(), vec![frame("secondary", 10)]], 50);
        assert_eq!(inputs, vec![FrameInput::Single(frame("secondary", 10))]);
    }

    #[test]
    fn test_live_pairer_waits_for_anchor() {
        let mut pairer = LivePairer::new(2, 50);
        pairer.offer(1, frame("secondary", 10));
        assert!(pairer.take_ready(&[true, true]).is_none());

        pairer.offer(0, frame("primary", 20));
        let input = pairer.take_ready(&[true, true]).unwrap();
        assert!(matches!(input, FrameInput::Ensemble(frames) if frames.len() == 2));

        // Primary closed: secondary becomes the anchor
        pairer.offer(1, frame("secondary", 60));
        assert!(matches!(
            pairer.take_ready(&[false, true]),
            Some(FrameInput::Single(_))
        ));
    }
}
