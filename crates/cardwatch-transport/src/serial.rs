//! Serial port transport.
//!
//! Card readers that emulate a serial line (USB CDC, FTDI bridges, ...)
//! push each presentation as plain text. The port is opened 8N1 without
//! flow control; reads only ever request the bytes the driver already
//! buffered, so they return without waiting on the line.

use std::io::Read;

use bytes::Bytes;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Transport;
use crate::types::PortSettings;

/// Transport over a local serial port.
pub struct SerialTransport {
    settings: PortSettings,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    pub fn new(settings: PortSettings) -> Self {
        Self {
            settings,
            port: None,
        }
    }

    pub fn settings(&self) -> &PortSettings {
        &self.settings
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::NotConnected)
    }
}

fn map_serial_error(port: &str, error: serialport::Error) -> TransportError {
    match error.kind() {
        serialport::ErrorKind::NoDevice => TransportError::disconnected(port),
        serialport::ErrorKind::Io(kind) => {
            TransportError::from_read(port, std::io::Error::new(kind, error.description))
        }
        _ => TransportError::read_failed(error.to_string()),
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("settings", &self.settings)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &str {
        &self.settings.port
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    async fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        self.settings.validate()?;

        let port = serialport::new(&self.settings.port, self.settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.settings.read_timeout())
            .open()
            .map_err(|e| TransportError::open_failed(&self.settings.port, e.to_string()))?;

        info!(
            port = %self.settings.port,
            baud_rate = self.settings.baud_rate,
            "Serial port opened"
        );
        self.port = Some(port);
        Ok(())
    }

    async fn pending_count(&mut self) -> Result<usize> {
        let pending = self.port_mut()?.bytes_to_read();
        pending
            .map(|count| count as usize)
            .map_err(|e| map_serial_error(&self.settings.port, e))
    }

    async fn read_available(&mut self, limit: usize) -> Result<Bytes> {
        let name = self.settings.port.clone();
        let port = self.port_mut()?;

        let pending = port
            .bytes_to_read()
            .map_err(|e| map_serial_error(&name, e))? as usize;
        let pending = pending.min(limit);
        if pending == 0 {
            return Ok(Bytes::new());
        }

        let mut buffer = vec![0u8; pending];
        let read = port
            .read(&mut buffer)
            .map_err(|e| TransportError::from_read(&name, e))?;
        buffer.truncate(read);
        Ok(Bytes::from(buffer))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(port) = self.port.take() {
            drop(port);
            debug!(port = %self.settings.port, "Serial port closed");
        }
        Ok(())
    }
}
