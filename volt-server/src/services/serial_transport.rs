use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::services::{LinkConnector, LinkTransport};

/// Longest acknowledgement line kept, the firmware never sends more.
const MAX_ACK_LEN: usize = 256;

/// Opens real ports through `serialport`, 8N1 without flow control.
pub struct SerialConnector {
    timeout: Duration,
}

impl SerialConnector {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}

impl Default for SerialConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkConnector for SerialConnector {
    fn open(&self, port_path: &str, baud_rate: u32) -> io::Result<Box<dyn LinkTransport>> {
        let port = serialport::new(port_path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()?;

        Ok(Box::new(SerialTransport { port }))
    }
}

struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl LinkTransport for SerialTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.flush()
    }

    fn clear_buffers(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::All)?;
        Ok(())
    }

    fn read_ack(&mut self) -> io::Result<Option<String>> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(None);
        }

        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        while line.len() < MAX_ACK_LEN {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e),
            }
        }

        let ack = String::from_utf8_lossy(&line).trim().to_string();

        Ok((!ack.is_empty()).then_some(ack))
    }
}
