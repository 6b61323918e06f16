//! Work payloads run by worker threads on every loop iteration.
//!
//! Each payload is a bounded, stateless computation. `Null` does nothing so the
//! loop measures pure branching + counter overhead.

use std::{fmt, hint::black_box};
use log::warn;

const FIB_STEPS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Work {
    Float,
    Int,
    /// float then int
    Comb1,
    /// int then float
    Comb2,
    Null,
}

/// One catalog row: how a payload is named on the command line and in help.
#[derive(Debug, Clone, Copy)]
pub struct WorkDescriptor {
    pub work: Work,
    pub ch: char,
    pub name: &'static str,
    pub descr: &'static str,
}

pub const CATALOG: &[WorkDescriptor] = &[
    WorkDescriptor { work: Work::Float, ch: 'f', name: "float", descr: "floating point test (fibonacci)" },
    WorkDescriptor { work: Work::Int, ch: 'i', name: "int", descr: "integer test (fibonacci)" },
    WorkDescriptor { work: Work::Comb1, ch: '1', name: "comb1", descr: "combined test that first runs float test, then int test" },
    WorkDescriptor { work: Work::Comb2, ch: '2', name: "comb2", descr: "combined test that first runs int test, then float test" },
    WorkDescriptor { work: Work::Null, ch: 'n', name: "null", descr: "null test that spins (branching, function call, etc)" },
];

impl Work {
    /// Run one unit of work.
    #[inline]
    pub fn run(self) {
        match self {
            Work::Float => work_float(),
            Work::Int => work_int(),
            Work::Comb1 => {
                work_float();
                work_int();
            }
            Work::Comb2 => {
                work_int();
                work_float();
            }
            Work::Null => {}
        }
    }

    pub fn name(self) -> &'static str {
        CATALOG
            .iter()
            .find(|d| d.work == self)
            .map(|d| d.name)
            .unwrap_or("?")
    }

    /// Matches a full catalog name or its single-character code.
    /// Empty and unknown identifiers fall back to `Null`.
    pub fn decode(s: &str) -> Work {
        if s.is_empty() {
            return Work::Null;
        }

        let mut chars = s.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        for d in CATALOG {
            if single == Some(d.ch) || s == d.name {
                return d.work;
            }
        }

        warn!("unknown work '{}', falling back to null", s);
        Work::Null
    }
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn work_int() {
    let mut n2: u32 = 0;
    let mut n1: u32 = 1;
    for _ in 0..FIB_STEPS {
        let n = black_box(n1.wrapping_add(n2));
        n2 = n1;
        n1 = n;
    }
    black_box(n1);
}

fn work_float() {
    let mut n2: f64 = 0.0;
    let mut n1: f64 = 1.0;
    for _ in 0..FIB_STEPS {
        let n = black_box(n1 + n2);
        n2 = n1;
        n1 = n;
    }
    black_box(n1);
}
