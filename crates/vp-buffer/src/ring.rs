//! Ring storage and overflow-policy handling.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::trace;

/// Construction-time choice of what happens on overflow (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Real-time producer policy: writes beyond capacity are dropped.
    Truncate,
    /// File-driven producer policy: writer blocks until capacity frees, up
    /// to a bounded wait.
    Block { max_wait: Duration },
}

/// Shared signal so a blocking writer can wake up promptly when the reader
/// frees space, instead of spin-polling. Read-side also uses it to avoid
/// busy-waiting on an empty ring if a caller chooses to block on read.
#[derive(Default)]
struct RingSignal {
    lock: Mutex<()>,
    cv: Condvar,
}

impl RingSignal {
    fn notify(&self) {
        self.cv.notify_all();
    }

    fn wait_timeout(&self, max_wait: Duration) {
        let guard = self.lock.lock().unwrap();
        let _ = self.cv.wait_timeout(guard, max_wait.min(Duration::from_millis(5)));
    }
}

pub(crate) fn build(capacity_samples: usize, policy: OverflowPolicy) -> (FrameRingWriter, FrameRingReader) {
    let rb = HeapRb::<i16>::new(capacity_samples);
    let (producer, consumer) = rb.split();
    let signal = Arc::new(RingSignal::default());
    let dropped = Arc::new(AtomicUsize::new(0));
    let underflows = Arc::new(AtomicUsize::new(0));
    (
        FrameRingWriter {
            producer,
            policy,
            signal: signal.clone(),
            dropped: dropped.clone(),
        },
        FrameRingReader { consumer, signal, dropped, underflows },
    )
}

/// Producer half of the ring. Owned by exactly one thread (typically the
/// capture callback or the processing thread handing off to playback).
pub struct FrameRingWriter {
    producer: HeapProducer<i16>,
    policy: OverflowPolicy,
    signal: Arc<RingSignal>,
    dropped: Arc<AtomicUsize>,
}

impl FrameRingWriter {
    /// Write `samples`, returning the number actually written. Under
    /// `Truncate`, this may be less than `samples.len()`. Under `Block`,
    /// this blocks (bounded by `max_wait`) until all samples fit or the
    /// deadline passes, whichever comes first — it still may return less
    /// than `samples.len()` if the deadline passes first.
    pub fn write(&mut self, samples: &[i16]) -> usize {
        match self.policy {
            OverflowPolicy::Truncate => self.write_truncating(samples),
            OverflowPolicy::Block { max_wait } => self.write_blocking(samples, max_wait),
        }
    }

    fn write_truncating(&mut self, samples: &[i16]) -> usize {
        let written = self.producer.push_slice(samples);
        if written < samples.len() {
            self.dropped.fetch_add(samples.len() - written, Ordering::Relaxed);
            trace!(dropped = samples.len() - written, "frame ring overflow, truncating");
        }
        if written > 0 {
            self.signal.notify();
        }
        written
    }

    fn write_blocking(&mut self, samples: &[i16], max_wait: Duration) -> usize {
        let deadline = Instant::now() + max_wait;
        let mut total_written = 0;
        while total_written < samples.len() {
            let n = self.producer.push_slice(&samples[total_written..]);
            total_written += n;
            if total_written == samples.len() {
                break;
            }
            if Instant::now() >= deadline {
                break;
            }
            self.signal.wait_timeout(deadline.saturating_duration_since(Instant::now()));
        }
        if total_written > 0 {
            self.signal.notify();
        }
        total_written
    }

    /// Number of samples free for writing without blocking/truncating.
    pub fn available_write(&self) -> usize {
        self.producer.free_len()
    }

    /// Samples dropped since construction due to `Truncate` overflow.
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half of the ring. Owned by exactly one thread.
pub struct FrameRingReader {
    consumer: HeapConsumer<i16>,
    signal: Arc<RingSignal>,
    dropped: Arc<AtomicUsize>,
    underflows: Arc<AtomicUsize>,
}

impl FrameRingReader {
    /// Read up to `out.len()` samples, returning how many were read. On
    /// underrun (not enough samples buffered), the caller is expected to
    /// fill the remainder with silence and record the underflow (§5
    /// "Processing thread blocks on the capture ring... on underrun it
    /// inserts a zero frame and records an underflow").
    pub fn read(&mut self, out: &mut [i16]) -> usize {
        let n = self.consumer.pop_slice(out);
        if n < out.len() {
            self.underflows.fetch_add(1, Ordering::Relaxed);
        }
        if n > 0 {
            self.signal.notify();
        }
        n
    }

    /// Number of samples currently available to read.
    pub fn available_read(&self) -> usize {
        self.consumer.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn underflow_count(&self) -> usize {
        self.underflows.load(Ordering::Relaxed)
    }
}
