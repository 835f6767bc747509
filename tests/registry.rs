use ragged_shape_inference::{
    Attrs, DataType, Dim, ErrorKind, InferShapes, InferShapesError, OpRegistry, RankConstraint, Shape,
};

fn to_sparse_attrs(ragged_rank: i64) -> Attrs {
    Attrs::new()
        .with("RAGGED_RANK", ragged_rank)
        .with("T", DataType::Float)
}

fn to_variant_attrs(ragged_rank: i64, batched_input: bool) -> Attrs {
    Attrs::new()
        .with("RAGGED_RANK", ragged_rank)
        .with("Tvalues", DataType::Int32)
        .with("Tsplits", DataType::Int64)
        .with("batched_input", batched_input)
}

fn from_variant_attrs(input_ragged_rank: i64, output_ragged_rank: i64) -> Attrs {
    Attrs::new()
        .with("input_ragged_rank", input_ragged_rank)
        .with("output_ragged_rank", output_ragged_rank)
        .with("Tvalues", DataType::Int32)
        .with("Tsplits", DataType::Int64)
}

#[test]
fn test_to_sparse() {
    let registry = OpRegistry::with_all_ops();
    let inputs = [
        Shape::unknown_of_rank(1),
        Shape::unknown_of_rank(1),
        Shape::matrix(Dim::Unknown, Dim::Known(3)),
    ];

    let outputs = registry
        .infer_shapes("RaggedTensorToSparse", &to_sparse_attrs(2), &inputs)
        .unwrap();

    assert_eq!(
        outputs,
        [
            Shape::matrix(Dim::Unknown, Dim::Known(4)),
            Shape::vector(Dim::Unknown),
            Shape::vector(Dim::Known(4)),
        ]
    );
    assert_eq!(outputs[0].to_string(), "[?, 4]");
}

#[test]
fn test_variant_round_trip() {
    let registry = OpRegistry::with_all_ops();

    // Encode a ragged tensor with ragged rank 2 as a batch of ragged tensors
    // with ragged rank 1.
    let encoded = registry
        .infer_shapes(
            "RaggedTensorToVariant",
            &to_variant_attrs(2, true),
            &[
                Shape::from_fixed(&[4]),
                Shape::from_fixed(&[10]),
                Shape::from_fixed(&[25, 2]),
            ],
        )
        .unwrap();
    assert_eq!(encoded, [Shape::from_fixed(&[3])]);

    let decoded = registry
        .infer_shapes("RaggedTensorFromVariant", &from_variant_attrs(1, 2), &encoded)
        .unwrap();
    assert_eq!(
        decoded,
        [
            Shape::unknown_of_rank(1),
            Shape::unknown_of_rank(1),
            Shape::unknown(),
        ]
    );

    // Decoding with a different batch rank fails.
    let err = registry
        .infer_shapes("RaggedTensorFromVariant", &from_variant_attrs(1, 1), &encoded)
        .unwrap_err();
    assert_eq!(
        err,
        InferShapesError::EncodedRankMismatch {
            expected: 0,
            actual: 1
        }
    );
    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
}

#[test]
fn test_errors() {
    let registry = OpRegistry::with_all_ops();

    let err = registry
        .infer_shapes(
            "RaggedTensorToSparse",
            &to_sparse_attrs(1),
            &[Shape::from_fixed(&[3, 3]), Shape::unknown()],
        )
        .unwrap_err();
    assert_eq!(
        err,
        InferShapesError::IncorrectRank {
            input: 0,
            expected: RankConstraint::Exactly(1),
            actual: 2
        }
    );
    assert_eq!(err.kind(), ErrorKind::RankMismatch);

    // Attributes are validated against the signature before inference.
    let err = registry
        .infer_shapes("RaggedTensorToSparse", &to_sparse_attrs(0), &[Shape::unknown()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttributeInvariant);

    let err = registry
        .infer_shapes(
            "RaggedTensorToVariant",
            &to_variant_attrs(1, true).with("Tsplits", DataType::Float),
            &[Shape::unknown(), Shape::unknown()],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttributeInvariant);

    let err = registry
        .infer_shapes("RaggedTensorToDense", &Attrs::new(), &[])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "operator \"RaggedTensorToDense\" is not registered"
    );
}

#[test]
fn test_read_op() {
    let registry = OpRegistry::with_all_ops();
    let op = registry
        .read_op("RaggedTensorToVariant", &to_variant_attrs(3, false))
        .unwrap();
    assert_eq!(op.input_count(), 4);
    assert_eq!(op.output_count(), 1);

    let sig = registry.signature("RaggedTensorToVariant").unwrap();
    assert_eq!(sig.input_count(&to_variant_attrs(3, false)), Ok(4));
}

#[cfg(feature = "serde")]
#[test]
fn test_serialize_shape() {
    let shape = Shape::matrix(Dim::Unknown, Dim::Known(4));
    let json = serde_json::to_string(&shape).unwrap();
    let parsed: Shape = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, shape);

    let unknown: Shape = serde_json::from_str(&serde_json::to_string(&Shape::unknown()).unwrap())
        .unwrap();
    assert_eq!(unknown, Shape::unknown());
}
