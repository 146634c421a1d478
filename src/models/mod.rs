pub mod annotation;
pub mod clip;

pub use annotation::{Annotation, AnnotationSet, BoundingBox};
pub use clip::{Clip, Movement, PERSON_CLASS};
