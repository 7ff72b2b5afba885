//! Record sources. Each reader returns a `Stream` that pulls from its input
//! only as the pipeline asks for rows.

pub mod csv;
pub mod lines;
