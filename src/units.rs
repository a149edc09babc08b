#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub i32);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub i32);

/// World space length of one cell side. Layout only, generation never reads it.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct CellSize(pub f32);
