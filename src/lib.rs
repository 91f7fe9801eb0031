// TODO:
// - tile-parallel rendering: the scene and octree are read-only after build,
//   each worker needs its own Random and a partitioned pixel accumulator

pub mod image;
pub mod model;
pub mod octree;
pub mod random;
pub mod scene;
pub mod spatial;
pub mod tracer;
