use tracing::debug;

/// Hands out unique local labels (`.L0`, `.L1`, ...) for one compilation.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: usize,
    function_label: Option<usize>,
}

impl LabelAllocator {
    pub fn new() -> Self {
        LabelAllocator::default()
    }

    pub fn create(&mut self) -> usize {
        let label = self.next;
        self.next += 1;
        debug!("created label {}", LabelAllocator::name(label));
        label
    }

    /// Creates a label and records it as the epilogue of the function
    /// being generated, the target of every `return` inside it.
    pub fn create_for_function(&mut self) -> usize {
        let label = self.create();
        self.function_label = Some(label);
        label
    }

    pub fn function_label(&self) -> Option<usize> {
        self.function_label
    }

    pub fn end_function(&mut self) {
        self.function_label = None;
    }

    pub fn name(label: usize) -> String {
        format!(".L{}", label)
    }
}
