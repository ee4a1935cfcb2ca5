/// Default number of rows each column buffer reserves up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Configuration for a [`Block`](crate::block::Block).
#[derive(Debug, Clone)]
pub struct BlockOptions {
    pub(crate) initial_capacity: usize,
}

impl Default for BlockOptions {
    fn default() -> Self {
        BlockOptions {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl BlockOptions {
    /// Rows reserved per column before the first write; buffers still grow past it.
    pub fn initial_capacity(self, initial_capacity: usize) -> Self {
        BlockOptions {
            initial_capacity,
            ..self
        }
    }
}
