//! Id assignment capability handed to each run.
//!
//! The engine keeps no global counter; whoever calls it decides how schedules
//! and blocks are named.

/// Supplies ids for the schedule and its blocks.
pub trait IdGenerator {
    fn schedule_id(&mut self) -> String;
    fn block_id(&mut self) -> String;
}

/// Random v4 UUIDs, for production callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn schedule_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn block_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids (`sched-0001`, `blk-0001`, ...) so that two runs over
/// the same input produce identical output.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    schedules: u32,
    blocks: u32,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn schedule_id(&mut self) -> String {
        self.schedules += 1;
        format!("sched-{:04}", self.schedules)
    }

    fn block_id(&mut self) -> String {
        self.blocks += 1;
        format!("blk-{:04}", self.blocks)
    }
}
