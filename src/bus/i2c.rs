#[cfg(target_os = "linux")]
use i2cdev::core::I2CDevice;
#[cfg(target_os = "linux")]
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use crate::bus::{Bus, BusFault};
use async_trait::async_trait;

// Errno values the kernel I2C layer reports for common bus faults.
#[cfg(target_os = "linux")]
const ETIMEDOUT: i32 = 110;
#[cfg(target_os = "linux")]
const ENXIO: i32 = 6;
#[cfg(target_os = "linux")]
const EREMOTEIO: i32 = 121;

#[cfg(target_os = "linux")]
impl From<LinuxI2CError> for BusFault {
    fn from(error: LinuxI2CError) -> Self {
        match error {
            LinuxI2CError::Errno(errno) if errno == ETIMEDOUT => BusFault::Timeout,
            LinuxI2CError::Errno(errno) if errno == ENXIO || errno == EREMOTEIO => BusFault::Nack,
            other => BusFault::Bus(other.to_string()),
        }
    }
}

/// I2C bus implementation
#[cfg(target_os = "linux")]
pub struct I2cBus {
    device: LinuxI2CDevice,
}

#[cfg(not(target_os = "linux"))]
pub struct I2cBus {
    _phantom: std::marker::PhantomData<()>,
}

#[cfg(target_os = "linux")]
impl I2cBus {
    pub fn new(path: &str) -> Result<Self, BusFault> {
        let device = LinuxI2CDevice::new(path, 0)?;
        Ok(Self { device })
    }
}

#[cfg(target_os = "linux")]
#[async_trait]
impl Bus for I2cBus {
    async fn transact(
        &mut self,
        address: u8,
        command: &[u8],
        response_len: usize,
    ) -> Result<u32, BusFault> {
        debug_assert!(response_len <= 4);

        self.device.set_slave_address(u16::from(address))?;
        if !command.is_empty() {
            self.device.write(command)?;
        }
        if response_len == 0 {
            return Ok(0);
        }

        let mut buf = [0u8; 4];
        self.device.read(&mut buf[..response_len])?;

        let mut raw = 0u32;
        for byte in &buf[..response_len] {
            raw = (raw << 8) | u32::from(*byte);
        }
        Ok(raw)
    }
}

#[cfg(not(target_os = "linux"))]
impl I2cBus {
    pub fn new(_path: &str) -> Result<Self, BusFault> {
        Err(BusFault::Bus(
            "I2C is only supported on Linux".to_string(),
        ))
    }
}

#[cfg(not(target_os = "linux"))]
#[async_trait]
impl Bus for I2cBus {
    async fn transact(
        &mut self,
        _address: u8,
        _command: &[u8],
        _response_len: usize,
    ) -> Result<u32, BusFault> {
        Err(BusFault::Bus(
            "I2C is only supported on Linux".to_string(),
        ))
    }
}
