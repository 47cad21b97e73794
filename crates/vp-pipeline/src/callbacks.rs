//! Host callback registration (spec §4.9 "Public API"). One slot per
//! callback, each guarded by its own mutex so a slow host callback on one
//! channel (say, logging every state change) never blocks another.

use std::sync::Mutex;

use vp_core::PipelineState;

pub type EncodedDataCallback = Box<dyn FnMut(&[u8], u32) + Send>;
pub type StateChangeCallback = Box<dyn FnMut(PipelineState, PipelineState) + Send>;
pub type ErrorCallback = Box<dyn FnMut(&vp_core::Error) + Send>;

#[derive(Default)]
pub struct Callbacks {
    pub(crate) encoded_data: Mutex<Option<EncodedDataCallback>>,
    pub(crate) state_change: Mutex<Option<StateChangeCallback>>,
    pub(crate) error: Mutex<Option<ErrorCallback>>,
}

impl Callbacks {
    pub fn set_encoded_data<F>(&self, f: F)
    where
        F: FnMut(&[u8], u32) + Send + 'static,
    {
        *self.encoded_data.lock().unwrap() = Some(Box::new(f));
    }

    pub fn set_state_change<F>(&self, f: F)
    where
        F: FnMut(PipelineState, PipelineState) + Send + 'static,
    {
        *self.state_change.lock().unwrap() = Some(Box::new(f));
    }

    pub fn set_error<F>(&self, f: F)
    where
        F: FnMut(&vp_core::Error) + Send + 'static,
    {
        *self.error.lock().unwrap() = Some(Box::new(f));
    }

    /// Invoke the `encoded_data` callback with the pre-SRTP RTP payload
    /// (spec §4.9: the callback always sees plaintext, since SRTP is a
    /// transport-level concern applied after this hook fires) and its RTP
    /// timestamp.
    pub(crate) fn fire_encoded_data(&self, payload: &[u8], rtp_timestamp: u32) {
        if let Some(cb) = self.encoded_data.lock().unwrap().as_mut() {
            cb(payload, rtp_timestamp);
        }
    }

    pub(crate) fn fire_state_change(&self, from: PipelineState, to: PipelineState) {
        if let Some(cb) = self.state_change.lock().unwrap().as_mut() {
            cb(from, to);
        }
    }

    pub(crate) fn fire_error(&self, error: &vp_core::Error) {
        if let Some(cb) = self.error.lock().unwrap().as_mut() {
            cb(error);
        }
    }
}
