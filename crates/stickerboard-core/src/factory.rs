//! Asynchronous sticker creation.
//!
//! Requests run off the event handler: on a worker thread natively and as a
//! spawned local future on the web. Finished glyphs come back through a channel that
//! the UI thread drains once per frame with [`StickerFactory::poll`].

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::glyph::{GlyphCache, GlyphError, GlyphImage, GlyphKey, GlyphRasterizer};
use crate::sticker::{Sticker, StickerPreset};

/// A finished glyph, ready to become a sticker.
#[derive(Debug, Clone)]
pub struct StickerReady {
    pub preset: StickerPreset,
    pub glyph: GlyphImage,
}

impl StickerReady {
    /// Build the sticker record. Position is chosen by the placement policy.
    pub fn into_sticker(self) -> Sticker {
        Sticker::new(self.glyph, self.preset.sticker_size())
    }
}

/// A glyph that could not be produced.
#[derive(Debug, Clone)]
pub struct StickerFailure {
    pub preset: StickerPreset,
    pub error: GlyphError,
}

pub type FactoryResult = Result<StickerReady, StickerFailure>;

struct Completion {
    preset: StickerPreset,
    result: Result<GlyphImage, GlyphError>,
}

/// Turns preset clicks into glyph images without blocking the caller.
pub struct StickerFactory {
    rasterizer: Arc<dyn GlyphRasterizer>,
    cache: GlyphCache,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl StickerFactory {
    pub fn new(rasterizer: Arc<dyn GlyphRasterizer>) -> Self {
        let (tx, rx) = channel();
        Self {
            rasterizer,
            cache: GlyphCache::new(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Ask for a sticker glyph at `pixel_ratio`. The result shows up in a later
    /// [`poll`](Self::poll).
    pub fn request(&mut self, preset: StickerPreset, pixel_ratio: f64) {
        let key = preset.glyph_key(pixel_ratio);
        self.in_flight += 1;

        if let Some(image) = self.cache.get(&key) {
            log::debug!("glyph cache hit for {} at {}x", preset.label, key.pixel_ratio());
            let _ = self.tx.send(Completion {
                preset,
                result: Ok(image.clone()),
            });
            return;
        }

        log::debug!("rasterizing {} at {}x", preset.label, key.pixel_ratio());
        spawn_rasterize(self.rasterizer.clone(), self.tx.clone(), preset, key);
    }

    /// Drain finished requests. Never blocks.
    pub fn poll(&mut self) -> Vec<FactoryResult> {
        let mut finished = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            finished.push(self.finish(completion));
        }
        finished
    }

    fn finish(&mut self, completion: Completion) -> FactoryResult {
        let Completion { preset, result } = completion;
        match result {
            Ok(glyph) => {
                if self.cache.get(&glyph.key).is_none() {
                    self.cache.insert(glyph.clone());
                }
                Ok(StickerReady { preset, glyph })
            }
            Err(error) => Err(StickerFailure { preset, error }),
        }
    }

    /// Requests not yet returned by [`poll`](Self::poll).
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn cached_glyphs(&self) -> usize {
        self.cache.len()
    }
}

fn rasterize_into(
    rasterizer: &dyn GlyphRasterizer,
    tx: &Sender<Completion>,
    preset: StickerPreset,
    key: &GlyphKey,
) {
    let result = rasterizer.rasterize(key).inspect(|image| {
        if image.is_blank() {
            log::warn!("glyph {:?} rendered fully transparent", key.glyph);
        }
    });
    // The factory may have been dropped; nothing is waiting then.
    let _ = tx.send(Completion { preset, result });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_rasterize(
    rasterizer: Arc<dyn GlyphRasterizer>,
    tx: Sender<Completion>,
    preset: StickerPreset,
    key: GlyphKey,
) {
    let spawned = std::thread::Builder::new()
        .name("glyph-raster".into())
        .spawn({
            let tx = tx.clone();
            move || rasterize_into(rasterizer.as_ref(), &tx, preset, &key)
        });
    if let Err(err) = spawned {
        log::error!("failed to start glyph worker: {err}");
        let _ = tx.send(Completion {
            preset,
            result: Err(GlyphError::Disconnected),
        });
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_rasterize(
    rasterizer: Arc<dyn GlyphRasterizer>,
    tx: Sender<Completion>,
    preset: StickerPreset,
    key: GlyphKey,
) {
    wasm_bindgen_futures::spawn_local(async move {
        rasterize_into(rasterizer.as_ref(), &tx, preset, &key);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::STICKER_PRESETS;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct CountingRasterizer {
        calls: AtomicUsize,
    }

    impl GlyphRasterizer for CountingRasterizer {
        fn rasterize(&self, key: &GlyphKey) -> Result<GlyphImage, GlyphError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let side = key.physical_size();
            GlyphImage::new(key.clone(), side, side, vec![255; (side * side * 4) as usize])
        }
    }

    struct NoContext;

    impl GlyphRasterizer for NoContext {
        fn rasterize(&self, _key: &GlyphKey) -> Result<GlyphImage, GlyphError> {
            Err(GlyphError::ContextUnavailable)
        }
    }

    fn wait_for(factory: &mut StickerFactory, count: usize) -> Vec<FactoryResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < count && Instant::now() < deadline {
            results.extend(factory.poll());
            std::thread::sleep(Duration::from_millis(2));
        }
        results
    }

    #[test]
    fn test_request_completes_through_poll() {
        let rasterizer = Arc::new(CountingRasterizer::default());
        let mut factory = StickerFactory::new(rasterizer.clone());

        factory.request(STICKER_PRESETS[0], 2.0);
        assert_eq!(factory.in_flight(), 1);

        let results = wait_for(&mut factory, 1);
        assert_eq!(results.len(), 1);
        let ready = results.into_iter().next().unwrap().unwrap();
        assert_eq!(ready.preset.label, "Cat");
        assert_eq!((ready.glyph.width, ready.glyph.height), (120, 120));
        assert_eq!(factory.in_flight(), 0);

        let sticker = ready.into_sticker();
        assert_eq!(sticker.size(), kurbo::Size::new(60.0, 60.0));
    }

    #[test]
    fn test_same_key_hits_cache() {
        let rasterizer = Arc::new(CountingRasterizer::default());
        let mut factory = StickerFactory::new(rasterizer.clone());

        factory.request(STICKER_PRESETS[1], 1.0);
        let first = wait_for(&mut factory, 1).remove(0).unwrap();
        factory.request(STICKER_PRESETS[1], 1.0);
        let second = wait_for(&mut factory, 1).remove(0).unwrap();

        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
        assert!(first.glyph.shares_pixels(&second.glyph));
        assert_eq!(factory.cached_glyphs(), 1);

        // A different pixel ratio is a different bitmap.
        factory.request(STICKER_PRESETS[1], 2.0);
        wait_for(&mut factory, 1);
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failure_is_reported_with_preset() {
        let mut factory = StickerFactory::new(Arc::new(NoContext));
        factory.request(STICKER_PRESETS[2], 1.0);

        let failure = wait_for(&mut factory, 1).remove(0).unwrap_err();
        assert_eq!(failure.preset.label, "Penguin");
        assert_eq!(failure.error, GlyphError::ContextUnavailable);
        assert_eq!(factory.cached_glyphs(), 0);
    }

    #[test]
    fn test_poll_without_requests_is_empty() {
        let mut factory = StickerFactory::new(Arc::new(CountingRasterizer::default()));
        assert!(factory.poll().is_empty());
    }
}
