//! The reader dispatcher: a tagged union over the two reader flavors with a
//! single dispatch point, rather than per-record vtables. Callers that don't
//! statically know which flavor they want (e.g. a public entry point
//! serving both in-transaction and outside-transaction callers) hold a
//! `Dispatcher` and call `.reader()` once to get the concrete `Reader` for
//! whichever flavor is active; every read operation after that is a plain
//! method call, not a second dispatch.

use super::Reader;
use crate::readers::{CommittedReader, MutatorReader};

pub enum Dispatcher<'a, 's> {
    Latest(&'a MutatorReader<'s>),
    Committed(&'a CommittedReader<'s>),
}

impl<'a, 's> Dispatcher<'a, 's> {
    pub fn reader(&self) -> Reader<'_> {
        match self {
            Dispatcher::Latest(m) => m.reader(),
            Dispatcher::Committed(c) => c.reader(),
        }
    }
}
