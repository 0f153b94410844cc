use tracing::{debug, error};

use crate::errors::errors::CodegenError;

/// Names of the scratch registers, by index.
pub const SCRATCH_REGISTERS: [&str; 6] = ["x0", "x1", "x2", "x3", "x4", "x5"];

/// A fixed pool of scratch registers with no spilling.
///
/// Running out of registers is fatal.
#[derive(Debug, Default)]
pub struct ScratchPool {
    in_use: [bool; SCRATCH_REGISTERS.len()],
}

impl ScratchPool {
    pub fn new() -> Self {
        ScratchPool::default()
    }

    /// Takes the lowest free register.
    pub fn alloc(&mut self) -> Result<usize, CodegenError> {
        let register = self
            .in_use
            .iter()
            .position(|in_use| !in_use)
            .ok_or(CodegenError::RegistersExhausted)?;

        self.in_use[register] = true;
        debug!("allocated scratch register {}", SCRATCH_REGISTERS[register]);
        Ok(register)
    }

    /// Returns a register to the pool. Unknown indices are reported and
    /// otherwise ignored.
    pub fn free(&mut self, register: usize) {
        match self.in_use.get_mut(register) {
            Some(in_use) => *in_use = false,
            None => error!("cannot free scratch register {}, it does not exist", register),
        }
    }

    pub fn name(&self, register: usize) -> Result<&'static str, CodegenError> {
        SCRATCH_REGISTERS
            .get(register)
            .copied()
            .ok_or(CodegenError::InvalidRegister(register))
    }

    /// Registers currently holding a value, lowest first.
    pub fn live(&self) -> Vec<usize> {
        (0..self.in_use.len()).filter(|r| self.in_use[*r]).collect()
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.iter().filter(|in_use| **in_use).count()
    }
}
