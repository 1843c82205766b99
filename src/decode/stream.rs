//! Run a decoder on its own thread, handing rows over one at a time.
//!
//! The channel has no buffer: the producer blocks in `send` until the consumer
//! takes the row, so at most one decoded row waits between them. Dropping the
//! stream disconnects the channel and the producer stops at its next send.

use crate::decode::RowDecoder;
use crate::decode::row::Row;
use crate::error::DecodeError;

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::debug;

pub struct RowStream<'scope> {
    rx: Receiver<Result<Row, DecodeError>>,
    producer: ScopedJoinHandle<'scope, ()>,
}

impl<'scope> RowStream<'scope> {
    /// Start decoding on a thread in `scope`.
    pub fn spawn<'env, 's, R>(scope: &'scope Scope<'scope, 'env>, decoder: RowDecoder<'s, R>) -> Self
    where
        's: 'scope,
        R: BufRead + Send + 'scope,
    {
        let (tx, rx) = mpsc::sync_channel(0);
        let producer = scope.spawn(move || {
            for item in decoder {
                if tx.send(item).is_err() {
                    debug!("row consumer hung up; stopping decode");
                    return;
                }
            }
        });

        Self { rx, producer }
    }

    /// Disconnect and wait for the producer. `Err` means it panicked.
    pub fn finish(self) -> thread::Result<()> {
        let RowStream { rx, producer } = self;
        drop(rx);
        producer.join()
    }
}

impl Iterator for RowStream<'_> {
    type Item = Result<Row, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Err here means the producer is done and dropped its sender.
        self.rx.recv().ok()
    }
}
