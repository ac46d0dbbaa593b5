use crossbeam_channel::{unbounded, Receiver, Sender};
use serialport::SerialPortInfo;
use std::io::{ErrorKind, Read};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, serial_number, manufacturer, product) = match &info.port_type {
            serialport::SerialPortType::UsbPort(usb) => (
                "USB".to_string(),
                Some(usb.vid),
                Some(usb.pid),
                usb.serial_number.clone(),
                usb.manufacturer.clone(),
                usb.product.clone(),
            ),
            serialport::SerialPortType::PciPort => ("PCI".to_string(), None, None, None, None, None),
            serialport::SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None, None, None, None, None),
            serialport::SerialPortType::Unknown => ("Unknown".to_string(), None, None, None, None, None),
        };
        Self {
            port_name: info.port_name,
            port_type,
            vid,
            pid,
            serial_number,
            manufacturer,
            product,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub read_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: 115_200,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            read_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
}

#[derive(Debug, Clone)]
pub enum LinkEvent {
    Opened(String),
    Rx(Vec<u8>),
    Error(String),
    Closed,
}

enum Command {
    Close,
}

/// An open serial connection with a reader thread pumping received bytes
/// into an event channel. Reads block up to the configured timeout, so the
/// thread idles in the driver rather than spinning.
pub struct SerialLink {
    cfg: LinkConfig,
    tx_cmd: Sender<Command>,
    rx_evt: Receiver<LinkEvent>,
}

impl SerialLink {
    pub fn list_ports() -> Vec<PortInfo> {
        serialport::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(PortInfo::from)
            .collect()
    }

    /// Opens the port on the calling thread, so a bad port name fails here,
    /// then hands it to the reader thread.
    pub fn open(cfg: LinkConfig) -> Result<Self, LinkError> {
        let mut port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.read_timeout)
            .open()
            .map_err(|source| LinkError::Open {
                port: cfg.port_name.clone(),
                source,
            })?;

        let (tx_cmd, rx_cmd) = unbounded::<Command>();
        let (tx_evt, rx_evt) = unbounded::<LinkEvent>();
        let port_name = cfg.port_name.clone();

        std::thread::spawn(move || {
            let _ = tx_evt.send(LinkEvent::Opened(port_name));
            let mut buf = [0u8; 4096];
            loop {
                match port.read(&mut buf) {
                    Ok(n) if n > 0 => {
                        log::trace!("rx {n} bytes");
                        let _ = tx_evt.send(LinkEvent::Rx(buf[..n].to_vec()));
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == ErrorKind::TimedOut => {
                        log::trace!("read timed out, retrying");
                    }
                    Err(e) => {
                        let _ = tx_evt.send(LinkEvent::Error(e.to_string()));
                        let _ = tx_evt.send(LinkEvent::Closed);
                        return;
                    }
                }
                while let Ok(cmd) = rx_cmd.try_recv() {
                    match cmd {
                        Command::Close => {
                            let _ = tx_evt.send(LinkEvent::Closed);
                            return;
                        }
                    }
                }
            }
        });

        Ok(Self { cfg, tx_cmd, rx_evt })
    }

    pub fn close(&self) {
        let _ = self.tx_cmd.send(Command::Close);
    }

    pub fn events(&self) -> &Receiver<LinkEvent> {
        &self.rx_evt
    }

    pub fn config(&self) -> &LinkConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_device_parameters() {
        let cfg = LinkConfig::default();
        assert_eq!(cfg.baud_rate, 115_200);
        assert_eq!(cfg.data_bits, serialport::DataBits::Eight);
        assert_eq!(cfg.stop_bits, serialport::StopBits::One);
        assert_eq!(cfg.parity, serialport::Parity::None);
        assert_eq!(cfg.read_timeout, Duration::from_secs(2));
    }

    #[test]
    fn open_fails_on_missing_device() {
        let cfg = LinkConfig {
            port_name: "/dev/tacwave-does-not-exist".to_string(),
            ..Default::default()
        };
        match SerialLink::open(cfg) {
            Err(LinkError::Open { port, .. }) => {
                assert_eq!(port, "/dev/tacwave-does-not-exist");
            }
            Ok(_) => panic!("open succeeded on a nonexistent device"),
        }
    }
}
