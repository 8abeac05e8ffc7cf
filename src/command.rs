//! Remote control commands and the queue carrying them to the render loop.
//!
//! Network handlers, interrupts or a UI push [`ControlCommand`]s from any
//! context. The queue is a `heapless::Deque` behind a critical-section
//! mutex; the composer drains it at the start of every tick, so a tick
//! always sees a consistent configuration.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use heapless::{Deque, String};

use crate::config::DisplayMode;
use crate::device::DeviceRequest;
use crate::text::{MAX_MESSAGE_LEN, MessageText};

/// Longest parameter text carried by a single command
pub const MAX_PARAMS_LEN: usize = 256;

/// Default queue depth
pub const DEFAULT_COMMAND_QUEUE_SIZE: usize = 4;

/// Parameter text as received, not yet parsed
pub type ParamsText = String<MAX_PARAMS_LEN>;

/// A change requested from outside the render loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Comma separated `key=value` pairs
    Params(ParamsText),
    /// Raw, still encoded message bytes
    Message(MessageText),
    /// Switch the display mode
    Mode(DisplayMode),
    /// A device interface write
    Device(DeviceRequest),
}

/// The queue was full, the command is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Failure to build or enqueue a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Input does not fit into the command's fixed capacity
    TooLong { len: usize, capacity: usize },
    /// The queue is full
    QueueFull,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len, capacity } => {
                write!(f, "command input of {len} bytes exceeds capacity {capacity}")
            }
            Self::QueueFull => f.write_str("command queue is full"),
        }
    }
}

impl<T> From<TrySendError<T>> for CommandError {
    fn from(_: TrySendError<T>) -> Self {
        Self::QueueFull
    }
}

/// Bounded command queue shared between producers and the render loop
pub struct CommandChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<ControlCommand, SIZE>>>,
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle; any number may exist
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Consumer handle for the render loop
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, command: ControlCommand) -> Result<(), TrySendError<ControlCommand>> {
        critical_section::with(|cs| {
            self.queue
                .borrow_ref_mut(cs)
                .push_back(command)
                .map_err(TrySendError)
        })
    }

    fn pop(&self) -> Option<ControlCommand> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }
}

/// Producer side of a [`CommandChannel`]
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Enqueue a command, handing it back if the queue is full
    pub fn try_send(&self, command: ControlCommand) -> Result<(), TrySendError<ControlCommand>> {
        self.channel.push(command)
    }

    /// Enqueue a parameter text
    pub fn send_params(&self, params: &str) -> Result<(), CommandError> {
        let text = ParamsText::try_from(params).map_err(|()| CommandError::TooLong {
            len: params.len(),
            capacity: MAX_PARAMS_LEN,
        })?;
        Ok(self.try_send(ControlCommand::Params(text))?)
    }

    /// Enqueue an encoded message
    ///
    /// Input longer than a message can hold is rejected rather than cut.
    pub fn send_message(&self, encoded: &[u8]) -> Result<(), CommandError> {
        let bytes = MessageText::from_slice(encoded).map_err(|()| CommandError::TooLong {
            len: encoded.len(),
            capacity: MAX_MESSAGE_LEN,
        })?;
        Ok(self.try_send(ControlCommand::Message(bytes))?)
    }

    pub fn send_mode(&self, mode: DisplayMode) -> Result<(), CommandError> {
        Ok(self.try_send(ControlCommand::Mode(mode))?)
    }

    /// Enqueue a device interface write; reads are answered directly by
    /// the composer
    pub fn send_device(&self, request: DeviceRequest) -> Result<(), CommandError> {
        Ok(self.try_send(ControlCommand::Device(request))?)
    }
}

/// Consumer side of a [`CommandChannel`]
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Next queued command, `None` when drained
    pub fn try_receive(&self) -> Option<ControlCommand> {
        self.channel.pop()
    }
}
