pub mod dependency_dag;

pub use dependency_dag::{DependencyDag, check_dependency_timeline};
