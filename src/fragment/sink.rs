//! Outgoing queues that accept fragments from a [`Fragmenter`](super::Fragmenter).
//!
//! Pushing never blocks. Local buffers simply grow; channel-backed sinks use
//! unbounded tokio senders so several producers can share one queue.

use std::collections::VecDeque;

use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

use super::{Fragment, FragmentationError};

/// Destination for outbound fragments.
pub trait FragmentSink {
    /// Append `fragment` to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::SinkClosed`] when the queue has shut down,
    /// or [`FragmentationError::Encode`] for sinks that encode on push.
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError>;
}

impl FragmentSink for Vec<Fragment> {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        self.push(fragment);
        Ok(())
    }
}

impl FragmentSink for VecDeque<Fragment> {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        self.push_back(fragment);
        Ok(())
    }
}

/// Collects encoded datagrams.
impl FragmentSink for Vec<Bytes> {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        self.push(fragment.encode()?);
        Ok(())
    }
}

impl FragmentSink for UnboundedSender<Fragment> {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        self.send(fragment).map_err(|_| FragmentationError::SinkClosed)
    }
}

/// Encodes each fragment before handing it to the channel.
impl FragmentSink for UnboundedSender<Bytes> {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        let datagram = fragment.encode()?;
        self.send(datagram).map_err(|_| FragmentationError::SinkClosed)
    }
}

impl<S: FragmentSink + ?Sized> FragmentSink for &mut S {
    fn push_fragment(&mut self, fragment: Fragment) -> Result<(), FragmentationError> {
        (**self).push_fragment(fragment)
    }
}
