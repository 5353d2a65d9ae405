//! CBOR wire form for programs.
//!
//! Every node is a tagged array whose first element names the variant:
//! `["%%", value]` for literals, `["$$", name, value]` for bindings,
//! `["()", function, ...args]` for calls, `["{}", ...body]` for blocks.
//! A program is the top-level array of its bindings.

use anyhow::{Result, anyhow};
use minicbor::data::Type;
use minicbor::decode::{self, Decode};
use minicbor::encode::{self, Encode, Write};
use minicbor::{Decoder, Encoder};

use crate::term::{Program, Scalar, Term};

const TAG_LITERAL: &str = "%%";
const TAG_BINDING: &str = "$$";
const TAG_CALL: &str = "()";
const TAG_BLOCK: &str = "{}";

/// Serializes a program for transmission.
pub fn encode_program(program: &Program) -> Result<Vec<u8>> {
    minicbor::to_vec(program).map_err(|e| anyhow!("could not encode program: {}", e))
}

/// Inverse of [`encode_program`].
pub fn decode_program(bytes: &[u8]) -> Result<Program> {
    minicbor::decode(bytes).map_err(|e| anyhow!("could not decode program: {}", e))
}

impl<C> Encode<C> for Scalar {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match self {
            Scalar::String(s) => e.str(s)?,
            Scalar::Int(i) => e.i64(*i)?,
            Scalar::Float(x) => e.f64(*x)?,
            Scalar::Bool(b) => e.bool(*b)?,
        };
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Scalar {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, decode::Error> {
        match d.datatype()? {
            Type::String => Ok(Scalar::String(d.str()?.to_string())),
            Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32
            | Type::I64 => Ok(Scalar::Int(d.i64()?)),
            Type::F16 | Type::F32 | Type::F64 => Ok(Scalar::Float(d.f64()?)),
            Type::Bool => Ok(Scalar::Bool(d.bool()?)),
            other => Err(decode::Error::type_mismatch(other)),
        }
    }
}

impl<C> Encode<C> for Term {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match self {
            Term::Literal(value) => {
                e.array(2)?.str(TAG_LITERAL)?;
                value.encode(e, ctx)?;
            }
            Term::Binding { name, value } => {
                e.array(3)?.str(TAG_BINDING)?.str(name)?;
                value.encode(e, ctx)?;
            }
            Term::Call {
                function,
                arguments,
            } => {
                e.array(2 + arguments.len() as u64)?.str(TAG_CALL)?.str(function)?;
                for argument in arguments {
                    argument.encode(e, ctx)?;
                }
            }
            Term::Block(body) => {
                e.array(1 + body.len() as u64)?.str(TAG_BLOCK)?;
                for entry in body {
                    entry.encode(e, ctx)?;
                }
            }
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Term {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        let Some(len) = d.array()? else {
            return Err(decode::Error::message("indefinite-length term"));
        };
        if len == 0 {
            return Err(decode::Error::message("empty term"));
        }
        match d.str()? {
            TAG_LITERAL => {
                if len != 2 {
                    return Err(decode::Error::message("malformed literal"));
                }
                Ok(Term::Literal(Scalar::decode(d, ctx)?))
            }
            TAG_BINDING => {
                if len != 3 {
                    return Err(decode::Error::message("malformed binding"));
                }
                let name = d.str()?.to_string();
                let value = Term::decode(d, ctx)?;
                Ok(Term::Binding {
                    name,
                    value: Box::new(value),
                })
            }
            TAG_CALL => {
                if len < 2 {
                    return Err(decode::Error::message("malformed call"));
                }
                let function = d.str()?.to_string();
                let mut arguments = Vec::with_capacity(len as usize - 2);
                for _ in 2..len {
                    arguments.push(Term::decode(d, ctx)?);
                }
                Ok(Term::Call {
                    function,
                    arguments,
                })
            }
            TAG_BLOCK => {
                let mut body = Vec::with_capacity(len as usize - 1);
                for _ in 1..len {
                    body.push(Term::decode(d, ctx)?);
                }
                Ok(Term::Block(body))
            }
            _ => Err(decode::Error::message("unknown term tag")),
        }
    }
}

impl<C> Encode<C> for Program {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.array(self.0.len() as u64)?;
        for term in &self.0 {
            term.encode(e, ctx)?;
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Program {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        let Some(len) = d.array()? else {
            return Err(decode::Error::message("indefinite-length program"));
        };
        let mut terms = Vec::with_capacity(len as usize);
        for _ in 0..len {
            terms.push(Term::decode(d, ctx)?);
        }
        Ok(Program(terms))
    }
}
