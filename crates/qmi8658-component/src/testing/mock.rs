extern crate std;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;

use crate::error::Error;
use crate::interface::{Interface, sealed};
use crate::output::{Output, ValueSink};

#[derive(Debug)]
struct MockState {
    regs: [u8; 256],
    reads: Vec<(u8, usize)>,
    writes: Vec<(u8, u8)>,
    absent: bool,
    failing_write: Option<u8>,
    failing_value: Option<(u8, u8)>,
    failing_read: Option<u8>,
}

/// Register-file device. Clones share the same state so a test can keep a
/// handle while the driver owns another.
#[derive(Clone, Debug)]
pub(crate) struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockInterface {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                regs: [0u8; 256],
                reads: Vec::new(),
                writes: Vec::new(),
                absent: false,
                failing_write: None,
                failing_value: None,
                failing_read: None,
            })),
        }
    }
}

impl MockInterface {
    /// Device answering WHO_AM_I with the expected identity.
    pub(crate) fn qmi8658() -> Self {
        Self::default().with_reg(0x00, 0x05).with_reg(0x01, 0x7C)
    }

    /// Device that never acknowledges.
    pub(crate) fn absent() -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().absent = true;
        mock
    }

    pub(crate) fn with_reg(self, reg: u8, value: u8) -> Self {
        self.set_reg(reg, value);
        self
    }

    pub(crate) fn set_reg(&self, reg: u8, value: u8) {
        self.state.borrow_mut().regs[reg as usize] = value;
    }

    pub(crate) fn set_regs(&self, reg: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (offset, value) in values.iter().enumerate() {
            state.regs[reg.wrapping_add(offset as u8) as usize] = *value;
        }
    }

    pub(crate) fn reg(&self, reg: u8) -> u8 {
        self.state.borrow().regs[reg as usize]
    }

    /// Makes every write to `reg` fail with a bus error.
    pub(crate) fn fail_writes_to(&self, reg: u8) {
        self.state.borrow_mut().failing_write = Some(reg);
    }

    /// Makes writes of exactly `value` to `reg` fail; other values go through.
    pub(crate) fn fail_write_of(&self, reg: u8, value: u8) {
        self.state.borrow_mut().failing_value = Some((reg, value));
    }

    /// Makes every read starting at `reg` fail with a bus error.
    pub(crate) fn fail_reads_from(&self, reg: u8) {
        self.state.borrow_mut().failing_read = Some(reg);
    }

    pub(crate) fn clear_failures(&self) {
        let mut state = self.state.borrow_mut();
        state.absent = false;
        state.failing_write = None;
        state.failing_value = None;
        state.failing_read = None;
    }

    /// Successful and failed writes, in order.
    pub(crate) fn writes(&self) -> Vec<(u8, u8)> {
        self.state.borrow().writes.clone()
    }

    /// Read transactions as `(start register, length)`, in order.
    pub(crate) fn reads(&self) -> Vec<(u8, usize)> {
        self.state.borrow().reads.clone()
    }

    pub(crate) fn transactions(&self) -> usize {
        let state = self.state.borrow();
        state.reads.len() + state.writes.len()
    }

    pub(crate) fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.reads.clear();
        state.writes.clear();
    }
}

impl Interface for MockInterface {
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error> {
        let mut buffer = [0u8];
        self.read_regs(reg, &mut buffer).await?;
        Ok(buffer[0])
    }

    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.reads.push((reg, buffer.len()));
        if state.absent || state.failing_read == Some(reg) {
            return Err(Error::Bus);
        }
        for (offset, slot) in buffer.iter_mut().enumerate() {
            let addr = reg.wrapping_add(offset as u8);
            *slot = state.regs[addr as usize];
        }
        Ok(())
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.writes.push((reg, value));
        if state.absent
            || state.failing_write == Some(reg)
            || state.failing_value == Some((reg, value))
        {
            return Err(Error::Bus);
        }
        state.regs[reg as usize] = value;
        Ok(())
    }
}

impl sealed::Sealed for MockInterface {}

#[derive(Default, Debug)]
pub(crate) struct MockDelay {
    pub(crate) calls: u32,
    pub(crate) last_ns: Option<u32>,
    pub(crate) total_ns: u64,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.last_ns = Some(ns);
        self.total_ns += u64::from(ns);
    }
}

/// Interrupt line whose level is driven by the test through a shared handle.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockPin {
    high: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
    reads: Rc<Cell<u32>>,
}

impl MockPin {
    pub(crate) fn set_high(&self) {
        self.high.set(true);
    }

    pub(crate) fn set_low(&self) {
        self.high.set(false);
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub(crate) fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        if self.failing.get() {
            return Err(ErrorKind::Other);
        }
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Sink recording every published value; clones share the record.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingSink {
    values: Rc<RefCell<Vec<(Output, f32)>>>,
}

impl RecordingSink {
    pub(crate) fn values(&self) -> Vec<(Output, f32)> {
        self.values.borrow().clone()
    }

    pub(crate) fn value(&self, output: Output) -> Option<f32> {
        self.values
            .borrow()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == output)
            .map(|(_, value)| *value)
    }
}

impl ValueSink for RecordingSink {
    fn publish(&mut self, output: Output, value: f32) {
        self.values.borrow_mut().push((output, value));
    }
}
