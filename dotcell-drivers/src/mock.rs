//! Bus and pin doubles shared by the driver tests
//!
//! Every double appends to one [`Log`] so tests can check the ordering of
//! pin edges relative to bus transfers.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c};
use embedded_hal::spi::{self, SpiDevice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    Delay(u32),
    I2c(u8, Vec<u8>),
    Spi(Vec<u8>),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct Pin {
    name: &'static str,
    log: Log,
}

impl Pin {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl digital::ErrorType for Pin {
    type Error = Infallible;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, true));
        Ok(())
    }
}

/// Delay that records the requested time instead of sleeping
pub struct Delay {
    log: Log,
}

impl Delay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns));
    }
}

pub struct I2cBus {
    log: Log,
    pub fail: bool,
}

impl I2cBus {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }
}

impl i2c::ErrorType for I2cBus {
    type Error = i2c::ErrorKind;
}

impl I2c for I2cBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(i2c::ErrorKind::NoAcknowledge(
                i2c::NoAcknowledgeSource::Address,
            ));
        }
        for op in operations {
            if let i2c::Operation::Write(bytes) = op {
                self.log
                    .borrow_mut()
                    .push(Event::I2c(address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

pub struct SpiBus {
    log: Log,
    pub fail: bool,
}

impl SpiBus {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }
}

impl spi::ErrorType for SpiBus {
    type Error = spi::ErrorKind;
}

impl SpiDevice for SpiBus {
    fn transaction(&mut self, operations: &mut [spi::Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(spi::ErrorKind::Other);
        }
        for op in operations {
            if let spi::Operation::Write(bytes) = op {
                self.log.borrow_mut().push(Event::Spi(bytes.to_vec()));
            }
        }
        Ok(())
    }
}

/// Levels each bit-banged frame was clocked with: the data pin level
/// sampled at every rising edge of `clock`
pub fn sampled_bits(events: &[Event], clock: &str, data: &str) -> Vec<bool> {
    let mut level = false;
    let mut bits = Vec::new();
    for event in events {
        match event {
            Event::Pin(name, high) if *name == data => level = *high,
            Event::Pin(name, true) if *name == clock => bits.push(level),
            _ => {}
        }
    }
    bits
}

pub fn total_delay_ns(events: &[Event]) -> u64 {
    events
        .iter()
        .map(|event| match event {
            Event::Delay(ns) => u64::from(*ns),
            _ => 0,
        })
        .sum()
}
