//! Registry of operators and their signatures.
//!
//! A graph builder refers to operators by name and describes each instance
//! with a set of attributes. The registry maps the name to the operator's
//! signature, validates the attributes against it, and constructs the
//! operator so that its output shapes can be inferred.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::attrs::{Attrs, DataType};
use crate::infer_shapes::{InferShapes, InferShapesError};
use crate::ops;
use crate::shape::Shape;

/// Number of tensors bound to an input or output argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgCount {
    /// Exactly one tensor.
    One,
    /// A list whose length is the value of the named integer attribute.
    Repeated(&'static str),
}

/// Element type of an input or output argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgType {
    Fixed(DataType),
    /// Element type given by the named type attribute.
    Attr(&'static str),
}

/// Declaration of an operator input or output.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgDef {
    pub name: &'static str,
    pub count: ArgCount,
    pub dtype: ArgType,
}

impl ArgDef {
    pub fn one(name: &'static str, dtype: ArgType) -> Self {
        Self {
            name,
            count: ArgCount::One,
            dtype,
        }
    }

    pub fn repeated(name: &'static str, count_attr: &'static str, dtype: ArgType) -> Self {
        Self {
            name,
            count: ArgCount::Repeated(count_attr),
            dtype,
        }
    }
}

impl fmt::Display for ArgDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        if let ArgCount::Repeated(count_attr) = self.count {
            write!(f, "{} * ", count_attr)?;
        }
        match self.dtype {
            ArgType::Fixed(dtype) => write!(f, "{}", dtype),
            ArgType::Attr(name) => write!(f, "{}", name),
        }
    }
}

/// Type and constraints of an operator attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrKind {
    /// Integer ragged rank, which must be at least `min` (0 or 1).
    RaggedRank { min: i64 },
    Bool,
    /// Type attribute, optionally restricted to a set of types and with a
    /// default.
    Type {
        allowed: Option<&'static [DataType]>,
        default: Option<DataType>,
    },
}

/// Declaration of an operator attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttrDef {
    pub name: &'static str,
    pub kind: AttrKind,
}

impl AttrDef {
    pub fn ragged_rank(name: &'static str, min: i64) -> Self {
        Self {
            name,
            kind: AttrKind::RaggedRank { min },
        }
    }

    pub fn bool(name: &'static str) -> Self {
        Self {
            name,
            kind: AttrKind::Bool,
        }
    }

    pub fn dtype(
        name: &'static str,
        allowed: Option<&'static [DataType]>,
        default: Option<DataType>,
    ) -> Self {
        Self {
            name,
            kind: AttrKind::Type { allowed, default },
        }
    }

    /// Check the value of this attribute in `attrs`, inserting the default
    /// value if it is missing and has one.
    fn check(&self, attrs: &mut Attrs) -> Result<(), InferShapesError> {
        match &self.kind {
            AttrKind::RaggedRank { min } => {
                let val = attrs.require_int(self.name)?;
                ops::check_ragged_rank(self.name, val, *min == 0)?;
            }
            AttrKind::Bool => {
                attrs.require_bool(self.name)?;
            }
            AttrKind::Type { allowed, default } => {
                if let (Some(default), false) = (default, attrs.contains(self.name)) {
                    attrs.insert(self.name, *default);
                }
                let dtype = attrs.require_type(self.name)?;
                if let Some(allowed) = allowed {
                    if !allowed.contains(&dtype) {
                        return Err(InferShapesError::invalid_attr(
                            self.name,
                            format!("type {} is not allowed", dtype),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AttrDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        match &self.kind {
            AttrKind::RaggedRank { min } => write!(f, "int >= {}", min),
            AttrKind::Bool => write!(f, "bool"),
            AttrKind::Type { allowed, default } => {
                match allowed {
                    Some(allowed) => {
                        let names: Vec<_> = allowed.iter().map(|dt| dt.name()).collect();
                        write!(f, "{{{}}}", names.join(", "))?;
                    }
                    None => write!(f, "type")?,
                }
                if let Some(default) = default {
                    write!(f, " = {}", default)?;
                }
                Ok(())
            }
        }
    }
}

/// Inputs, outputs and attributes of an operator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpSignature {
    pub inputs: Vec<ArgDef>,
    pub outputs: Vec<ArgDef>,
    pub attrs: Vec<AttrDef>,
}

impl OpSignature {
    /// Validate `attrs` against the declared attributes.
    ///
    /// Returns a copy of the attributes with defaults filled in. Attributes
    /// which are not declared are ignored.
    pub fn check_attrs(&self, attrs: &Attrs) -> Result<Attrs, InferShapesError> {
        let mut checked = attrs.clone();
        for attr in &self.attrs {
            attr.check(&mut checked)?;
        }
        Ok(checked)
    }

    /// Return the number of input tensors for an operator with the given
    /// attributes.
    pub fn input_count(&self, attrs: &Attrs) -> Result<usize, InferShapesError> {
        arg_count(&self.inputs, attrs)
    }

    /// Return the number of output tensors for an operator with the given
    /// attributes.
    pub fn output_count(&self, attrs: &Attrs) -> Result<usize, InferShapesError> {
        arg_count(&self.outputs, attrs)
    }
}

fn arg_count(args: &[ArgDef], attrs: &Attrs) -> Result<usize, InferShapesError> {
    args.iter().try_fold(0, |total, arg| {
        let count = match arg.count {
            ArgCount::One => 1,
            ArgCount::Repeated(count_attr) => {
                let count = attrs.require_int(count_attr)?;
                usize::try_from(count).map_err(|_| {
                    InferShapesError::invalid_attr(count_attr, "must be non-negative")
                })?
            }
        };
        Ok(total + count)
    })
}

/// An operator which can infer its output shapes.
pub type BoxedOp = Box<dyn InferShapes + Send + Sync>;

pub type ReadOpResult = Result<BoxedOp, InferShapesError>;

type ReadOpFunction = dyn Fn(&Attrs) -> ReadOpResult + Send + Sync;

/// Construct an operator from its attributes.
pub trait ReadOp: InferShapes + Sized + Send + Sync + 'static {
    /// Name of the operator.
    fn op_type() -> &'static str;

    /// Declared inputs, outputs and attributes.
    fn signature() -> OpSignature;

    /// Create the operator from attributes which have been checked against
    /// [`signature`](ReadOp::signature).
    fn read(attrs: &Attrs) -> Result<Self, InferShapesError>;

    /// Create the operator and box it.
    fn read_boxed(attrs: &Attrs) -> ReadOpResult {
        let op = Self::read(attrs)?;
        Ok(Box::new(op))
    }
}

struct RegisteredOp {
    signature: OpSignature,
    read: Box<ReadOpFunction>,
}

/// Registry used to look up operators by name.
///
/// New registries have no operators registered. Use
/// [`OpRegistry::with_all_ops`] to create a registry with all built-in
/// operators, or register operators selectively with
/// [`OpRegistry::register_op`].
///
/// ```
/// use ragged_shape_inference::{Attrs, DataType, OpRegistry, Shape, Dim};
///
/// let registry = OpRegistry::with_all_ops();
/// let attrs = Attrs::new()
///     .with("RAGGED_RANK", 1)
///     .with("Tvalues", DataType::Float)
///     .with("Tsplits", DataType::Int64)
///     .with("batched_input", true);
/// let inputs = [Shape::from_fixed(&[5]), Shape::from_fixed(&[12, 3])];
///
/// let outputs = registry
///     .infer_shapes("RaggedTensorToVariant", &attrs, &inputs)
///     .unwrap();
/// assert_eq!(outputs, [Shape::vector(Dim::Known(4))]);
/// ```
#[derive(Default)]
pub struct OpRegistry {
    ops: FxHashMap<&'static str, RegisteredOp>,
}

impl OpRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator.
    pub fn register_op<Op: ReadOp>(&mut self) {
        self.ops.insert(
            Op::op_type(),
            RegisteredOp {
                signature: Op::signature(),
                read: Box::new(Op::read_boxed),
            },
        );
    }

    /// Create a new registry with all built-in operators registered.
    pub fn with_all_ops() -> Self {
        let mut reg = Self::new();
        reg.register_op::<ops::RaggedTensorFromVariant>();
        reg.register_op::<ops::RaggedTensorToSparse>();
        reg.register_op::<ops::RaggedTensorToVariant>();
        reg
    }

    /// Return the names of registered operators, in sorted order.
    pub fn op_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ops.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Return the signature of a registered operator.
    pub fn signature(&self, op_type: &str) -> Option<&OpSignature> {
        self.ops.get(op_type).map(|op| &op.signature)
    }

    fn get(&self, op_type: &str) -> Result<&RegisteredOp, InferShapesError> {
        self.ops
            .get(op_type)
            .ok_or_else(|| InferShapesError::UnknownOp {
                name: op_type.to_string(),
            })
    }

    /// Validate attributes and construct an operator.
    pub fn read_op(&self, op_type: &str, attrs: &Attrs) -> ReadOpResult {
        let op = self.get(op_type)?;
        let attrs = op.signature.check_attrs(attrs)?;
        (op.read)(&attrs)
    }

    /// Infer the output shapes of an operator instance.
    ///
    /// This is the entry point used during graph construction. Either every
    /// output shape is returned, or an error describing the first violated
    /// constraint.
    pub fn infer_shapes(
        &self,
        op_type: &str,
        attrs: &Attrs,
        inputs: &[Shape],
    ) -> Result<Vec<Shape>, InferShapesError> {
        tracing::trace!(op_type, ?inputs, "inferring shapes");

        let result = self
            .read_op(op_type, attrs)
            .and_then(|op| op.infer_shapes(inputs));

        match &result {
            Ok(outputs) => {
                tracing::trace!(op_type, ?outputs, "inferred shapes");
            }
            Err(err) => {
                tracing::debug!(op_type, kind = ?err.kind(), %err, "shape inference failed");
            }
        }

        result
    }
}

const SPLITS_TYPES: &[DataType] = &[DataType::Int32, DataType::Int64];

impl ReadOp for ops::RaggedTensorToSparse {
    fn op_type() -> &'static str {
        "RaggedTensorToSparse"
    }

    fn signature() -> OpSignature {
        OpSignature {
            inputs: vec![
                ArgDef::repeated(
                    "rt_nested_splits",
                    "RAGGED_RANK",
                    ArgType::Attr("Tsplits"),
                ),
                ArgDef::one("rt_dense_values", ArgType::Attr("T")),
            ],
            outputs: vec![
                ArgDef::one("sparse_indices", ArgType::Fixed(DataType::Int64)),
                ArgDef::one("sparse_values", ArgType::Attr("T")),
                ArgDef::one("sparse_dense_shape", ArgType::Fixed(DataType::Int64)),
            ],
            attrs: vec![
                AttrDef::ragged_rank("RAGGED_RANK", 1),
                AttrDef::dtype("T", None, None),
                AttrDef::dtype("Tsplits", Some(SPLITS_TYPES), Some(DataType::Int64)),
            ],
        }
    }

    fn read(attrs: &Attrs) -> Result<Self, InferShapesError> {
        Ok(Self {
            ragged_rank: attrs.require_int("RAGGED_RANK")?,
        })
    }
}

impl ReadOp for ops::RaggedTensorToVariant {
    fn op_type() -> &'static str {
        "RaggedTensorToVariant"
    }

    fn signature() -> OpSignature {
        OpSignature {
            inputs: vec![
                ArgDef::repeated(
                    "rt_nested_splits",
                    "RAGGED_RANK",
                    ArgType::Attr("Tsplits"),
                ),
                ArgDef::one("rt_dense_values", ArgType::Attr("Tvalues")),
            ],
            outputs: vec![ArgDef::one(
                "encoded_ragged",
                ArgType::Fixed(DataType::Variant),
            )],
            attrs: vec![
                AttrDef::ragged_rank("RAGGED_RANK", 1),
                AttrDef::dtype("Tvalues", None, None),
                AttrDef::dtype("Tsplits", Some(SPLITS_TYPES), None),
                AttrDef::bool("batched_input"),
            ],
        }
    }

    fn read(attrs: &Attrs) -> Result<Self, InferShapesError> {
        Ok(Self {
            ragged_rank: attrs.require_int("RAGGED_RANK")?,
            batched_input: attrs.require_bool("batched_input")?,
        })
    }
}

impl ReadOp for ops::RaggedTensorFromVariant {
    fn op_type() -> &'static str {
        "RaggedTensorFromVariant"
    }

    fn signature() -> OpSignature {
        OpSignature {
            inputs: vec![ArgDef::one(
                "encoded_ragged",
                ArgType::Fixed(DataType::Variant),
            )],
            outputs: vec![
                ArgDef::repeated(
                    "output_nested_splits",
                    "output_ragged_rank",
                    ArgType::Attr("Tsplits"),
                ),
                ArgDef::one("output_dense_values", ArgType::Attr("Tvalues")),
            ],
            attrs: vec![
                AttrDef::ragged_rank("input_ragged_rank", 0),
                AttrDef::ragged_rank("output_ragged_rank", 1),
                AttrDef::dtype("Tvalues", None, None),
                AttrDef::dtype("Tsplits", Some(SPLITS_TYPES), None),
            ],
        }
    }

    fn read(attrs: &Attrs) -> Result<Self, InferShapesError> {
        Ok(Self {
            input_ragged_rank: attrs.require_int("input_ragged_rank")?,
            output_ragged_rank: attrs.require_int("output_ragged_rank")?,
        })
    }
}
