//=========================================================================
// Utilities
//=========================================================================
//
// Small helpers shared by gameplay code:
// - Stopwatches: labelled profiling timers
// - FlatVec3Ext: ground-plane vector math
//
//=========================================================================

//=== Module Declarations =================================================

mod timer;
mod vector;

//=== Public API ==========================================================

pub use timer::Stopwatches;
pub use vector::FlatVec3Ext;
