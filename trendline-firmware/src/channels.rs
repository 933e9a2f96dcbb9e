//! Inter-task communication channels
//!
//! Defines the static channels connecting the pipeline stages. Tasks get
//! their ends of each channel as spawn arguments; the UART0 handler gets
//! the control sender through [`crate::serial::start`].
//!
//! The sample and average queues are only touched from thread mode. The
//! control queue is written from interrupt context and needs the
//! critical-section mutex.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, ThreadModeRawMutex};
use embassy_sync::channel::{Channel, Receiver, Sender};

use trendline_core::filter::{FilteredSample, WindowSize};
use trendline_core::pipeline::QUEUE_DEPTH;
use trendline_core::Sample;

/// Generator to filter
pub static SAMPLES: Channel<ThreadModeRawMutex, Sample, QUEUE_DEPTH> = Channel::new();

/// Filter to trend renderer
pub static AVERAGES: Channel<ThreadModeRawMutex, FilteredSample, QUEUE_DEPTH> = Channel::new();

/// Serial console to filter
pub static CONTROL: Channel<CriticalSectionRawMutex, WindowSize, QUEUE_DEPTH> = Channel::new();

pub type SampleSender = Sender<'static, ThreadModeRawMutex, Sample, QUEUE_DEPTH>;
pub type SampleReceiver = Receiver<'static, ThreadModeRawMutex, Sample, QUEUE_DEPTH>;
pub type AverageSender = Sender<'static, ThreadModeRawMutex, FilteredSample, QUEUE_DEPTH>;
pub type AverageReceiver = Receiver<'static, ThreadModeRawMutex, FilteredSample, QUEUE_DEPTH>;
pub type ControlSender = Sender<'static, CriticalSectionRawMutex, WindowSize, QUEUE_DEPTH>;
pub type ControlReceiver = Receiver<'static, CriticalSectionRawMutex, WindowSize, QUEUE_DEPTH>;
