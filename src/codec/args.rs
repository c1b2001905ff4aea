use rosc::OscType;

use crate::messages::{ParameterValue, Vector3};

/// Strict cursor over an OSC argument list. Every accessor returns `None` on a
/// missing argument or a tag mismatch.
pub(crate) struct Args<'a> {
    iter: std::slice::Iter<'a, OscType>,
}

impl<'a> Args<'a> {
    pub(crate) fn new(args: &'a [OscType]) -> Self {
        Self { iter: args.iter() }
    }

    pub(crate) fn string(&mut self) -> Option<String> {
        match self.iter.next()? {
            OscType::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub(crate) fn int(&mut self) -> Option<i32> {
        match self.iter.next()? {
            OscType::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn float(&mut self) -> Option<f32> {
        match self.iter.next()? {
            OscType::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn boolean(&mut self) -> Option<bool> {
        match self.iter.next()? {
            OscType::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub(crate) fn value(&mut self) -> Option<ParameterValue> {
        match self.iter.next()? {
            OscType::Float(v) => Some(ParameterValue::Float(*v)),
            OscType::Int(v) => Some(ParameterValue::Int(*v)),
            OscType::Bool(b) => Some(ParameterValue::Bool(*b)),
            _ => None,
        }
    }

    pub(crate) fn vector3(&mut self) -> Option<Vector3> {
        Some(Vector3::new(self.float()?, self.float()?, self.float()?))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.iter.len()
    }

    /// Consumes the cursor, yielding `value` only if no arguments are left over.
    pub(crate) fn finish<T>(self, value: T) -> Option<T> {
        if self.remaining() == 0 {
            Some(value)
        } else {
            None
        }
    }
}

pub(crate) fn value_arg(value: ParameterValue) -> OscType {
    match value {
        ParameterValue::Float(v) => OscType::Float(v),
        ParameterValue::Int(v) => OscType::Int(v),
        ParameterValue::Bool(b) => OscType::Bool(b),
    }
}

pub(crate) fn push_vector3(args: &mut Vec<OscType>, v: Vector3) {
    args.extend([OscType::Float(v.x), OscType::Float(v.y), OscType::Float(v.z)]);
}
