use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::expr::{IntoOperand, Op, Operand};

/// An insertion-ordered set of field assignments.
///
/// A field set with [`Record::maybe`] and `None` is kept but absent: it is
/// skipped by every statement builder, unlike a field explicitly set to
/// NULL.
#[derive(Debug, Default, Clone)]
pub struct Record {
    values: IndexMap<SmolStr, Option<Operand>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K, V>(&mut self, field: K, value: V) -> &mut Self
    where
        K: Into<SmolStr>,
        V: IntoOperand,
    {
        self.values.insert(field.into(), Some(value.into_operand()));
        self
    }

    pub fn maybe<K, V>(&mut self, field: K, value: Option<V>) -> &mut Self
    where
        K: Into<SmolStr>,
        V: IntoOperand,
    {
        self.values
            .insert(field.into(), value.map(IntoOperand::into_operand));
        self
    }

    /// Number of fields that carry a value.
    pub fn len(&self) -> usize {
        self.values.values().filter(|value| value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, field: &str) -> bool {
        matches!(self.values.get(field), Some(Some(_)))
    }

    /// Present pairs, in insertion order.
    pub(crate) fn into_pairs(self) -> Vec<(SmolStr, Operand)> {
        self.values
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .collect()
    }
}

pub trait IntoRecord {
    fn into_record(self) -> Record;
}

impl IntoRecord for Record {
    #[inline(always)]
    fn into_record(self) -> Record {
        self
    }
}

impl IntoRecord for &mut Record {
    fn into_record(self) -> Record {
        std::mem::take(self)
    }
}

impl<K, V, const N: usize> IntoRecord for [(K, V); N]
where
    K: Into<SmolStr>,
    V: IntoOperand,
{
    fn into_record(self) -> Record {
        let mut record = Record::new();
        for (field, value) in self {
            record.set(field, value);
        }
        record
    }
}

impl<K, V> IntoRecord for Vec<(K, V)>
where
    K: Into<SmolStr>,
    V: IntoOperand,
{
    fn into_record(self) -> Record {
        let mut record = Record::new();
        for (field, value) in self {
            record.set(field, value);
        }
        record
    }
}

impl<K, V> IntoRecord for IndexMap<K, V>
where
    K: Into<SmolStr>,
    V: IntoOperand,
{
    fn into_record(self) -> Record {
        let mut record = Record::new();
        for (field, value) in self {
            record.set(field, value);
        }
        record
    }
}

/// A where clause: a ready predicate or a record folded into one.
#[derive(Debug, Clone)]
pub enum Filter {
    Op(Op),
    Record(Record),
}

pub trait IntoFilter {
    fn into_filter(self) -> Filter;
}

impl IntoFilter for Filter {
    fn into_filter(self) -> Filter {
        self
    }
}

impl IntoFilter for Op {
    fn into_filter(self) -> Filter {
        Filter::Op(self)
    }
}

impl IntoFilter for &Op {
    fn into_filter(self) -> Filter {
        Filter::Op(self.clone())
    }
}

impl<T: IntoRecord> IntoFilter for T {
    fn into_filter(self) -> Filter {
        Filter::Record(self.into_record())
    }
}
