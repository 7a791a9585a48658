//! Target-size compression.
//!
//! Finds the highest encoder quality whose output fits a byte budget with a
//! bounded binary search over `[min_quality, max_quality]`. Each probe is one
//! full encode, so the number of probes is fixed up front (8 by default,
//! resolving the quality to `(max - min) / 256`).
//!
//! The search assumes encoded size does not grow as quality drops. Under
//! mild non-monotonicity it still lands near the best fitting quality.
//!
//! Probes run strictly one after another: the next quality depends on the
//! previous size. [`compress_to_target_async`] drives the same search with an
//! asynchronous encoder, awaiting each probe in turn.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::encode::{self as codec, EncodedResult, OutputFormat};
use crate::error::{EngineError, Result};

/// What to do when the encoder fails at a probed quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodeErrorPolicy {
    /// Stop the search and return the error.
    #[default]
    Abort,
    /// Count the probe as over budget and keep searching.
    TreatAsOversized,
}

/// Search parameters for [`compress_to_target`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    pub min_quality: f32,
    pub max_quality: f32,
    pub iterations: u32,
    pub on_encode_error: EncodeErrorPolicy,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            min_quality: 0.1,
            max_quality: 0.95,
            iterations: 8,
            on_encode_error: EncodeErrorPolicy::Abort,
        }
    }
}

impl CompressOptions {
    /// Check `0 < min_quality <= max_quality <= 1` and `iterations >= 1`.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_quality, self.max_quality);
        if !(min > 0.0 && min <= max && max <= 1.0) {
            return Err(EngineError::InvalidOptions(format!(
                "quality range [{}, {}] must satisfy 0 < min <= max <= 1",
                min, max
            )));
        }
        if self.iterations == 0 {
            return Err(EngineError::InvalidOptions(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Search state handed to the `keep_going` callback before each probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress {
    /// Probes completed so far.
    pub probes: u32,
    pub iterations: u32,
    pub low: f32,
    pub high: f32,
    /// Quality of the best result within budget, if any.
    pub best_quality: Option<f32>,
}

/// The chosen encoding and how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOutcome {
    pub result: EncodedResult,
    pub quality: f32,
    /// False when the result is over budget (nothing in range fit).
    pub reached_target: bool,
    /// Number of encoder calls made.
    pub probes: u32,
}

/// Binary search state shared by the sync and async drivers.
struct QualitySearch {
    target_bytes: u64,
    options: CompressOptions,
    low: f32,
    high: f32,
    probes: u32,
    best: Option<(f32, EncodedResult)>,
}

enum Step {
    Probe(f32),
    Done(CompressOutcome),
    /// No probe fit; encode at the floor quality.
    Floor(f32),
}

impl QualitySearch {
    fn new(target_bytes: u64, options: CompressOptions) -> Self {
        Self {
            target_bytes,
            options,
            low: options.min_quality,
            high: options.max_quality,
            probes: 0,
            best: None,
        }
    }

    fn progress(&self) -> SearchProgress {
        SearchProgress {
            probes: self.probes,
            iterations: self.options.iterations,
            low: self.low,
            high: self.high,
            best_quality: self.best.as_ref().map(|(quality, _)| *quality),
        }
    }

    fn fits(&self, result: &EncodedResult) -> bool {
        result.size_in_bytes() <= self.target_bytes
    }

    /// Decide the next action. `stop` ends the search early.
    fn next(&mut self, stop: bool) -> Step {
        if !stop && self.probes < self.options.iterations {
            return Step::Probe((self.low + self.high) / 2.0);
        }
        match self.best.take() {
            Some((quality, result)) => {
                debug!(
                    quality,
                    size = result.size_in_bytes(),
                    target = self.target_bytes,
                    probes = self.probes,
                    "target size reached"
                );
                Step::Done(CompressOutcome {
                    result,
                    quality,
                    reached_target: true,
                    probes: self.probes,
                })
            }
            None => Step::Floor(self.options.min_quality),
        }
    }

    fn record(&mut self, quality: f32, encoded: Result<EncodedResult>) -> Result<()> {
        self.probes += 1;
        let result = match encoded {
            Ok(result) => result,
            Err(err) => match self.options.on_encode_error {
                EncodeErrorPolicy::Abort => return Err(err),
                EncodeErrorPolicy::TreatAsOversized => {
                    debug!(quality, error = %err, "probe failed, treating as oversized");
                    self.high = quality;
                    return Ok(());
                }
            },
        };

        let fits = self.fits(&result);
        debug!(
            quality,
            size = result.size_in_bytes(),
            target = self.target_bytes,
            fits,
            "quality probe"
        );
        if fits {
            self.low = quality;
            self.best = Some((quality, result));
        } else {
            self.high = quality;
        }
        Ok(())
    }

    fn floor(&self, quality: f32, result: EncodedResult) -> CompressOutcome {
        let reached_target = self.fits(&result);
        debug!(
            quality,
            size = result.size_in_bytes(),
            target = self.target_bytes,
            reached_target,
            "no probe fit, using floor quality"
        );
        CompressOutcome {
            result,
            quality,
            reached_target,
            probes: self.probes + 1,
        }
    }
}

/// Encode once for lossless formats, where quality has no effect on size.
fn lossless_outcome(
    target_bytes: u64,
    options: &CompressOptions,
    result: EncodedResult,
) -> CompressOutcome {
    CompressOutcome {
        reached_target: result.size_in_bytes() <= target_bytes,
        result,
        quality: options.max_quality,
        probes: 1,
    }
}

/// Find the highest quality whose encoding is at most `target_bytes`.
///
/// `encode` is called with the bitmap and a quality in
/// `[min_quality, max_quality]`; [`crate::encode::encode`] is one such
/// encoder. If no probe fits, the result is the encoding at `min_quality`
/// and `reached_target` reports whether that floor fits.
///
/// Lossless formats skip the search: one encode, returned as is.
///
/// # Errors
///
/// - `EngineError::InvalidOptions` if the options fail validation
/// - encoder errors, immediately under `EncodeErrorPolicy::Abort`, and for
///   the floor encode under either policy
pub fn compress_to_target<E>(
    bitmap: &Bitmap,
    target_bytes: u64,
    format: OutputFormat,
    encode: E,
    options: &CompressOptions,
) -> Result<CompressOutcome>
where
    E: FnMut(&Bitmap, f32) -> Result<EncodedResult>,
{
    compress_to_target_until(bitmap, target_bytes, format, encode, options, |_| true)
}

/// [`compress_to_target`] with cooperative cancellation.
///
/// `keep_going` runs before every probe; returning `false` ends the search
/// with the best result so far (or the floor encode if nothing fit yet).
/// Use it for deadlines or user cancellation.
pub fn compress_to_target_until<E, K>(
    bitmap: &Bitmap,
    target_bytes: u64,
    format: OutputFormat,
    encode: E,
    options: &CompressOptions,
    keep_going: K,
) -> Result<CompressOutcome>
where
    E: FnMut(&Bitmap, f32) -> Result<EncodedResult>,
    K: FnMut(&SearchProgress) -> bool,
{
    let single = format.is_lossless();
    run_search(bitmap, target_bytes, single, encode, options, keep_going)
}

/// [`compress_to_target`] with the built-in [`encode`](crate::encode::encode).
///
/// Formats the built-in encoder writes losslessly (PNG and WebP) are encoded
/// once, since quality cannot change their size.
///
/// # Errors
///
/// Same as [`compress_to_target`].
pub fn compress_builtin(
    bitmap: &Bitmap,
    target_bytes: u64,
    format: OutputFormat,
    options: &CompressOptions,
) -> Result<CompressOutcome> {
    let single = !codec::honors_quality(format);
    let encode = |bitmap: &Bitmap, quality: f32| codec::encode(bitmap, format, quality);
    run_search(bitmap, target_bytes, single, encode, options, |_| true)
}

fn run_search<E, K>(
    bitmap: &Bitmap,
    target_bytes: u64,
    single: bool,
    mut encode: E,
    options: &CompressOptions,
    mut keep_going: K,
) -> Result<CompressOutcome>
where
    E: FnMut(&Bitmap, f32) -> Result<EncodedResult>,
    K: FnMut(&SearchProgress) -> bool,
{
    options.validate()?;
    if single {
        let result = encode(bitmap, options.max_quality)?;
        return Ok(lossless_outcome(target_bytes, options, result));
    }

    let mut search = QualitySearch::new(target_bytes, *options);
    loop {
        let stop = !keep_going(&search.progress());
        match search.next(stop) {
            Step::Probe(quality) => {
                let encoded = encode(bitmap, quality);
                search.record(quality, encoded)?;
            }
            Step::Done(outcome) => return Ok(outcome),
            Step::Floor(quality) => {
                let result = encode(bitmap, quality)?;
                return Ok(search.floor(quality, result));
            }
        }
    }
}

/// [`compress_to_target`] with an asynchronous encoder.
///
/// Each probe is awaited before the next begins. Dropping the returned
/// future abandons the search at the next await point.
pub async fn compress_to_target_async<E, F>(
    bitmap: &Bitmap,
    target_bytes: u64,
    format: OutputFormat,
    mut encode: E,
    options: &CompressOptions,
) -> Result<CompressOutcome>
where
    E: FnMut(&Bitmap, f32) -> F,
    F: Future<Output = Result<EncodedResult>>,
{
    options.validate()?;
    if format.is_lossless() {
        let result = encode(bitmap, options.max_quality).await?;
        return Ok(lossless_outcome(target_bytes, options, result));
    }

    let mut search = QualitySearch::new(target_bytes, *options);
    loop {
        match search.next(false) {
            Step::Probe(quality) => {
                let encoded = encode(bitmap, quality).await;
                search.record(quality, encoded)?;
            }
            Step::Done(outcome) => return Ok(outcome),
            Step::Floor(quality) => {
                let result = encode(bitmap, quality).await?;
                return Ok(search.floor(quality, result));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Monotone size model: 48 000 bytes at 0.5, 61 000 at 0.6.
    fn modeled_size(quality: f32) -> usize {
        let q = quality as f64;
        let size = if q <= 0.5 {
            48_000.0 - (0.5 - q) * 50_000.0
        } else {
            48_000.0 + (q - 0.5) * 130_000.0
        };
        size as usize
    }

    fn mock_encode(_bitmap: &Bitmap, quality: f32) -> Result<EncodedResult> {
        Ok(EncodedResult::new(
            vec![0u8; modeled_size(quality)],
            OutputFormat::Jpeg,
        ))
    }

    fn bitmap() -> Bitmap {
        Bitmap::solid(8, 8, [10, 20, 30]).unwrap()
    }

    #[test]
    fn test_converges_below_budget() {
        let fitting = RefCell::new(Vec::new());
        let encode = |bitmap: &Bitmap, quality: f32| -> Result<EncodedResult> {
            let result = mock_encode(bitmap, quality)?;
            if result.size_in_bytes() <= 50_000 {
                fitting.borrow_mut().push(quality);
            }
            Ok(result)
        };
        let outcome = compress_to_target(
            &bitmap(),
            50_000,
            OutputFormat::Jpeg,
            encode,
            &CompressOptions::default(),
        )
        .unwrap();

        assert!(outcome.reached_target);
        assert!(outcome.result.size_in_bytes() <= 50_000);
        assert_eq!(outcome.probes, 8);

        // The best fitting probe wins, not the first one
        let best = fitting.into_inner().into_iter().fold(f32::MIN, f32::max);
        assert_eq!(outcome.quality, best);
        // Budget is crossed at q ~= 0.5154; 8 probes resolve to (0.95 - 0.1) / 256
        assert!(outcome.quality > 0.515 && outcome.quality <= 0.5154, "{}", outcome.quality);
    }

    #[test]
    fn test_probe_sequence_is_binary_search() {
        let probed = RefCell::new(Vec::new());
        let encode = |bitmap: &Bitmap, quality: f32| {
            probed.borrow_mut().push(quality);
            mock_encode(bitmap, quality)
        };
        compress_to_target(
            &bitmap(),
            50_000,
            OutputFormat::Jpeg,
            encode,
            &CompressOptions::default(),
        )
        .unwrap();

        let probed = probed.into_inner();
        assert_eq!(probed.len(), 8);
        assert!((probed[0] - 0.525).abs() < 1e-6);
        // 0.525 is over budget, so the next probe is below it
        assert!((probed[1] - 0.3125).abs() < 1e-6);
    }

    #[test]
    fn test_unreachable_target_falls_back_to_floor() {
        let outcome = compress_to_target(
            &bitmap(),
            100,
            OutputFormat::Jpeg,
            mock_encode,
            &CompressOptions::default(),
        )
        .unwrap();

        assert!(!outcome.reached_target);
        assert_eq!(outcome.quality, 0.1);
        assert_eq!(outcome.result.size_in_bytes(), modeled_size(0.1) as u64);
        assert_eq!(outcome.probes, 9);
    }

    #[test]
    fn test_floor_that_fits_reports_reached() {
        // Only qualities below every probe fit
        let target = modeled_size(0.101) as u64;
        let outcome = compress_to_target(
            &bitmap(),
            target,
            OutputFormat::Jpeg,
            mock_encode,
            &CompressOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.quality, 0.1);
        assert!(outcome.reached_target);
    }

    #[test]
    fn test_lossless_encodes_once() {
        let calls = RefCell::new(0);
        let encode = |_: &Bitmap, _: f32| -> Result<EncodedResult> {
            *calls.borrow_mut() += 1;
            Ok(EncodedResult::new(vec![0u8; 70_000], OutputFormat::Png))
        };
        let outcome = compress_to_target(
            &bitmap(),
            50_000,
            OutputFormat::Png,
            encode,
            &CompressOptions::default(),
        )
        .unwrap();

        assert_eq!(calls.into_inner(), 1);
        assert_eq!(outcome.probes, 1);
        assert!(!outcome.reached_target);
    }

    #[test]
    fn test_builtin_webp_encodes_once() {
        let mut pixels = Vec::with_capacity(32 * 32 * 3);
        for y in 0..32u32 {
            for x in 0..32u32 {
                pixels.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, ((x ^ y) * 8) as u8]);
            }
        }
        let image = Bitmap::new(32, 32, pixels).unwrap();

        let outcome =
            compress_builtin(&image, 1, OutputFormat::WebP, &CompressOptions::default()).unwrap();
        assert_eq!(outcome.probes, 1);
        assert_eq!(outcome.quality, 0.95);
        assert!(!outcome.reached_target);
        assert_eq!(outcome.result.format, OutputFormat::WebP);
    }

    #[test]
    fn test_builtin_jpeg_searches() {
        let image = Bitmap::solid(16, 16, [90, 90, 90]).unwrap();
        let outcome = compress_builtin(
            &image,
            10_000_000,
            OutputFormat::Jpeg,
            &CompressOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.probes, 8);
        assert!(outcome.reached_target);
    }

    #[test]
    fn test_external_webp_encoder_is_searched() {
        let calls = RefCell::new(0);
        let encode = |bitmap: &Bitmap, quality: f32| -> Result<EncodedResult> {
            *calls.borrow_mut() += 1;
            let mut result = mock_encode(bitmap, quality)?;
            result.format = OutputFormat::WebP;
            Ok(result)
        };
        let outcome = compress_to_target(
            &bitmap(),
            50_000,
            OutputFormat::WebP,
            encode,
            &CompressOptions::default(),
        )
        .unwrap();
        assert_eq!(calls.into_inner(), 8);
        assert!(outcome.reached_target);
    }

    #[test]
    fn test_encode_error_aborts() {
        let encode = |bitmap: &Bitmap, quality: f32| {
            if quality > 0.5 {
                Err(EngineError::EncodingFailed("codec crashed".to_string()))
            } else {
                mock_encode(bitmap, quality)
            }
        };
        let result = compress_to_target(
            &bitmap(),
            1_000_000,
            OutputFormat::Jpeg,
            encode,
            &CompressOptions::default(),
        );
        assert_eq!(
            result,
            Err(EngineError::EncodingFailed("codec crashed".to_string()))
        );
    }

    #[test]
    fn test_encode_error_treated_as_oversized() {
        let encode = |bitmap: &Bitmap, quality: f32| {
            if quality > 0.5 {
                Err(EngineError::EncodingFailed("codec crashed".to_string()))
            } else {
                mock_encode(bitmap, quality)
            }
        };
        let options = CompressOptions {
            on_encode_error: EncodeErrorPolicy::TreatAsOversized,
            ..CompressOptions::default()
        };
        let outcome =
            compress_to_target(&bitmap(), 1_000_000, OutputFormat::Jpeg, encode, &options).unwrap();

        assert!(outcome.reached_target);
        assert!(outcome.quality <= 0.5 && outcome.quality > 0.49);
        assert_eq!(outcome.probes, 8);
    }

    #[test]
    fn test_floor_encode_error_propagates() {
        let encode = |_: &Bitmap, _: f32| -> Result<EncodedResult> {
            Err(EngineError::EncodingFailed("no codec".to_string()))
        };
        let options = CompressOptions {
            on_encode_error: EncodeErrorPolicy::TreatAsOversized,
            ..CompressOptions::default()
        };
        let result = compress_to_target(&bitmap(), 10, OutputFormat::Jpeg, encode, &options);
        assert!(matches!(result, Err(EngineError::EncodingFailed(_))));
    }

    #[test]
    fn test_keep_going_stops_early() {
        let outcome = compress_to_target_until(
            &bitmap(),
            50_000,
            OutputFormat::Jpeg,
            mock_encode,
            &CompressOptions::default(),
            |progress| progress.probes < 3,
        )
        .unwrap();

        // 0.525 misses, then 0.3125 and 0.41875 fit
        assert_eq!(outcome.probes, 3);
        assert!(outcome.reached_target);
        assert!((outcome.quality - 0.41875).abs() < 1e-6);
    }

    #[test]
    fn test_cancel_before_first_probe_uses_floor() {
        let outcome = compress_to_target_until(
            &bitmap(),
            50_000,
            OutputFormat::Jpeg,
            mock_encode,
            &CompressOptions::default(),
            |_| false,
        )
        .unwrap();
        assert_eq!(outcome.probes, 1);
        assert_eq!(outcome.quality, 0.1);
        assert!(outcome.reached_target);
    }

    #[test]
    fn test_progress_reports_search_window() {
        let seen = RefCell::new(Vec::new());
        compress_to_target_until(
            &bitmap(),
            50_000,
            OutputFormat::Jpeg,
            mock_encode,
            &CompressOptions::default(),
            |progress| {
                seen.borrow_mut().push(*progress);
                true
            },
        )
        .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen[0].probes, 0);
        assert_eq!((seen[0].low, seen[0].high), (0.1, 0.95));
        assert_eq!(seen[0].best_quality, None);
        assert!((seen[1].high - 0.525).abs() < 1e-6);
        assert!(seen[2].best_quality.is_some());
    }

    #[test]
    fn test_invalid_options() {
        let cases = [
            CompressOptions {
                min_quality: 0.0,
                ..CompressOptions::default()
            },
            CompressOptions {
                min_quality: 0.9,
                max_quality: 0.5,
                ..CompressOptions::default()
            },
            CompressOptions {
                max_quality: 1.5,
                ..CompressOptions::default()
            },
            CompressOptions {
                min_quality: f32::NAN,
                ..CompressOptions::default()
            },
            CompressOptions {
                iterations: 0,
                ..CompressOptions::default()
            },
        ];
        for options in cases {
            let result =
                compress_to_target(&bitmap(), 1000, OutputFormat::Jpeg, mock_encode, &options);
            assert!(
                matches!(result, Err(EngineError::InvalidOptions(_))),
                "{:?}",
                options
            );
        }
    }

    #[test]
    fn test_with_builtin_jpeg_encoder() {
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for y in 0..64u32 {
            for x in 0..64u32 {
                pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
            }
        }
        let img = Bitmap::new(64, 64, pixels).unwrap();
        let encode = |b: &Bitmap, q: f32| crate::encode::encode(b, OutputFormat::Jpeg, q);

        let generous =
            compress_to_target(&img, 10_000_000, OutputFormat::Jpeg, encode, &CompressOptions::default())
                .unwrap();
        assert!(generous.reached_target);
        assert!(generous.quality > 0.9);

        let impossible =
            compress_to_target(&img, 1, OutputFormat::Jpeg, encode, &CompressOptions::default())
                .unwrap();
        assert!(!impossible.reached_target);
        assert_eq!(impossible.quality, 0.1);
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let options = CompressOptions::default();
        let img = bitmap();
        let sync = compress_to_target(&img, 50_000, OutputFormat::Jpeg, mock_encode, &options)
            .unwrap();

        let encode = |_: &Bitmap, quality: f32| async move {
            tokio::task::yield_now().await;
            Ok::<_, EngineError>(EncodedResult::new(
                vec![0u8; modeled_size(quality)],
                OutputFormat::Jpeg,
            ))
        };
        let outcome = compress_to_target_async(&img, 50_000, OutputFormat::Jpeg, encode, &options)
            .await
            .unwrap();

        assert_eq!(outcome, sync);
    }

    #[tokio::test]
    async fn test_async_lossless_single_encode() {
        let encode = |bitmap: &Bitmap, _: f32| {
            let result = crate::encode::encode(bitmap, OutputFormat::Png, 1.0);
            async move { result }
        };
        let outcome = compress_to_target_async(
            &bitmap(),
            1_000_000,
            OutputFormat::Png,
            encode,
            &CompressOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.probes, 1);
        assert!(outcome.reached_target);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strictly increasing size in quality, scaled by `slope`.
    fn linear_encoder(slope: f64) -> impl FnMut(&Bitmap, f32) -> Result<EncodedResult> {
        move |_, quality| {
            let size = (1_000.0 + quality as f64 * slope) as usize;
            Ok(EncodedResult::new(vec![0u8; size], OutputFormat::Jpeg))
        }
    }

    proptest! {
        /// Property: Returned quality never decreases as the budget grows.
        #[test]
        fn prop_quality_monotone_in_budget(
            slope in 1_000.0f64..200_000.0,
            a in 0u64..250_000,
            b in 0u64..250_000,
        ) {
            let img = Bitmap::solid(2, 2, [0, 0, 0]).unwrap();
            let (small, large) = (a.min(b), a.max(b));
            let options = CompressOptions::default();

            let low = compress_to_target(&img, small, OutputFormat::Jpeg, linear_encoder(slope), &options).unwrap();
            let high = compress_to_target(&img, large, OutputFormat::Jpeg, linear_encoder(slope), &options).unwrap();
            prop_assert!(low.quality <= high.quality);
        }

        /// Property: The budget is met whenever the floor quality fits.
        #[test]
        fn prop_fits_when_floor_fits(
            slope in 1_000.0f64..200_000.0,
            target in 0u64..250_000,
        ) {
            let img = Bitmap::solid(2, 2, [0, 0, 0]).unwrap();
            let options = CompressOptions::default();
            let floor_size = (1_000.0 + options.min_quality as f64 * slope) as u64;

            let outcome = compress_to_target(&img, target, OutputFormat::Jpeg, linear_encoder(slope), &options).unwrap();
            prop_assert_eq!(outcome.reached_target, floor_size <= target);
            if outcome.reached_target {
                prop_assert!(outcome.result.size_in_bytes() <= target);
            }
            prop_assert!(outcome.quality >= options.min_quality && outcome.quality <= options.max_quality);
        }
    }
}
