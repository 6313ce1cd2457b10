//! rodio 音频源
//!
//! 每条轨道一个 `Sink`。文件在后台线程中解码为 PCM，完成后追加到 sink
//! 并通过 `LoadNotifier` 通知引擎。播放到结尾后 sink 变空，此时视为暂停；
//! 再次播放或 seek 时重新追加缓存的 PCM。

use egui_multitrack::{AudioSource, LoadNotifier, SourceError, SourceFactory, TrackState};
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// 解码后的 PCM
struct Decoded {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl Decoded {
    fn duration(&self) -> f64 {
        let frames = self.samples.len() / self.channels.max(1) as usize;
        frames as f64 / self.sample_rate.max(1) as f64
    }

    fn buffer(&self) -> SamplesBuffer<f32> {
        SamplesBuffer::new(self.channels, self.sample_rate, self.samples.clone())
    }
}

fn decode(path: &str) -> Result<Decoded, SourceError> {
    let file = File::open(path)?;
    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| SourceError::Decode(e.to_string()))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples().collect();
    if samples.is_empty() {
        return Err(SourceError::Decode(format!("{path} contains no audio")));
    }
    Ok(Decoded {
        channels,
        sample_rate,
        samples,
    })
}

pub struct RodioSource {
    sink: Option<Arc<Sink>>,
    decoded: Arc<Mutex<Option<Decoded>>>,
    volume: f32,
    muted: bool,
}

impl RodioSource {
    fn new(handle: &OutputStreamHandle) -> Self {
        let sink = match Sink::try_new(handle) {
            Ok(sink) => {
                sink.pause();
                Some(Arc::new(sink))
            }
            Err(e) => {
                log::error!("Failed to create audio sink: {}", e);
                None
            }
        };
        Self {
            sink,
            decoded: Arc::new(Mutex::new(None)),
            volume: 1.0,
            muted: false,
        }
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(if self.muted { 0.0 } else { self.volume });
        }
    }

    /// 播放结束后 sink 为空，重新排入缓存的 PCM
    fn requeue(&self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if !sink.empty() {
            return;
        }
        if let Ok(decoded) = self.decoded.lock() {
            if let Some(decoded) = decoded.as_ref() {
                sink.append(decoded.buffer());
            }
        }
    }
}

impl AudioSource for RodioSource {
    fn play(&mut self) {
        self.requeue();
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn paused(&self) -> bool {
        self.sink
            .as_ref()
            .map_or(true, |sink| sink.is_paused() || sink.empty())
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |sink| sink.get_pos().as_secs_f64())
    }

    fn set_current_time(&mut self, time: f64) {
        self.requeue();
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.try_seek(Duration::from_secs_f64(time.max(0.0))) {
                log::warn!("Seek to {:.3}s failed: {:?}", time, e);
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        self.decoded
            .lock()
            .ok()
            .and_then(|decoded| decoded.as_ref().map(Decoded::duration))
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.apply_volume();
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    fn load(&mut self, url: &str, notifier: LoadNotifier) {
        let Some(sink) = self.sink.clone() else {
            notifier.failed(SourceError::Output("no audio output".to_string()));
            return;
        };
        let decoded = Arc::clone(&self.decoded);
        let path = url.to_string();

        thread::spawn(move || match decode(&path) {
            Ok(pcm) => {
                let duration = pcm.duration();
                sink.append(pcm.buffer());
                if let Ok(mut slot) = decoded.lock() {
                    *slot = Some(pcm);
                }
                log::debug!("Decoded {} ({:.3}s)", path, duration);
                notifier.loaded(duration);
            }
            Err(e) => notifier.failed(e),
        });
    }
}

impl Drop for RodioSource {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
    }
}

/// 为每条轨道创建一个共享输出流的 `RodioSource`
pub struct RodioFactory {
    handle: OutputStreamHandle,
}

impl RodioFactory {
    pub fn new(handle: OutputStreamHandle) -> Self {
        Self { handle }
    }
}

impl SourceFactory for RodioFactory {
    fn create(&mut self, _track: &TrackState) -> Box<dyn AudioSource> {
        Box::new(RodioSource::new(&self.handle))
    }
}
