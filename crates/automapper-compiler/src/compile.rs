//! Mapper compilation.
//!
//! Turns the resolved bindings of one pair into a single closure. The closure
//! constructs a default target, then for each binding reads the source field,
//! produces the target value and writes it. Nested objects and sequence
//! elements go through the [`MapperLookup`] passed in at map time.

use std::any::Any;

use tracing::debug;

use automapper_core::{
    CompiledMapper, ConversionError, Converter, DateFormats, FieldGetter, FieldSetter, MapError,
    MapperLookup, ObjectValue, PairRef, ScalarKind, TypeDescriptor, TypeMeta, Value,
    convert_scalar,
};
use automapper_registry::MappingConfig;

use crate::resolver::{BindingDecision, ElementPlan, UnresolvedOverridePolicy, resolve_bindings};

/// Options that influence how a mapper is built.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub unresolved_overrides: UnresolvedOverridePolicy,
    pub formats: DateFormats,
}

enum Op {
    Copy,
    Convert { from: ScalarKind, to: ScalarKind },
    Custom(Converter),
    Nested(PairRef),
    Sequence(ElementPlan),
}

struct Step {
    field: &'static str,
    source_ty: TypeDescriptor,
    get: FieldGetter,
    set: FieldSetter,
    op: Op,
}

/// Context for one field while the mapper runs.
struct Run<'a> {
    source_type: &'static str,
    target_type: &'static str,
    field: &'static str,
    formats: &'a DateFormats,
    lookup: &'a dyn MapperLookup,
}

impl Run<'_> {
    fn wrap(&self, source: ConversionError) -> MapError {
        MapError::Conversion {
            source_type: self.source_type,
            target_type: self.target_type,
            field: self.field.to_string(),
            source,
        }
    }

    fn nested(&self, pair: &PairRef, value: Value) -> Result<Value, MapError> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(self.wrap(ConversionError::TypeMismatch {
                    expected: "object",
                    actual: other.type_name(),
                }));
            }
        };
        let mapper = self.lookup.mapper(pair)?;
        let mapped = mapper.map_any(obj.as_any(), self.lookup)?;
        Ok(Value::Object(ObjectValue::from_boxed(
            mapper.pair().target,
            mapper.target_name(),
            mapped,
        )))
    }

    fn element(&self, plan: &ElementPlan, value: Value) -> Result<Value, MapError> {
        match plan {
            ElementPlan::Copy => Ok(value),
            ElementPlan::Convert { from, to } => {
                convert_scalar(value, *from, *to, self.formats).map_err(|e| self.wrap(e))
            }
            ElementPlan::Map(pair) => self.nested(pair, value),
            ElementPlan::Sequence(inner) => self.sequence(inner, value),
        }
    }

    fn sequence(&self, plan: &ElementPlan, value: Value) -> Result<Value, MapError> {
        match value {
            Value::Seq(items) => items
                .into_iter()
                .map(|item| self.element(plan, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq),
            other => Err(self.wrap(ConversionError::TypeMismatch {
                expected: "sequence",
                actual: other.type_name(),
            })),
        }
    }

    fn apply(&self, step: &Step, value: Value) -> Result<Value, MapError> {
        match &step.op {
            Op::Copy => Ok(value),
            Op::Convert { from, to } => {
                convert_scalar(value, *from, *to, self.formats).map_err(|e| self.wrap(e))
            }
            Op::Custom(converter) => converter
                .apply_checked(&step.source_ty, value)
                .map_err(|e| self.wrap(e)),
            Op::Nested(pair) => self.nested(pair, value),
            Op::Sequence(plan) => self.sequence(plan, value),
        }
    }
}

/// Compile the mapper for one pair.
///
/// Fails with [`MapError::Construction`] when the target has no constructor,
/// and with [`MapError::UnresolvedOverride`] in strict mode.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(
    pair: &PairRef,
    source: &TypeMeta,
    target: &TypeMeta,
    config: &MappingConfig,
    options: &CompileOptions,
) -> Result<CompiledMapper, MapError> {
    let constructor = target
        .constructor
        .ok_or(MapError::Construction { target: target.name })?;

    let bindings = resolve_bindings(source, target, config, options.unresolved_overrides)?;

    let mut steps = Vec::with_capacity(bindings.len());
    let mut skipped = 0usize;
    for binding in bindings {
        let op = match binding.decision {
            BindingDecision::Skip(reason) => {
                debug!(
                    source = source.name,
                    target = target.name,
                    field = binding.source.name,
                    %reason,
                    "field skipped"
                );
                skipped += 1;
                continue;
            }
            BindingDecision::DirectCopy => Op::Copy,
            BindingDecision::ImplicitConvert { from, to } => Op::Convert { from, to },
            BindingDecision::CustomConvert(converter) => Op::Custom(converter),
            BindingDecision::NestedMap(nested) => Op::Nested(nested),
            BindingDecision::CollectionMap { plan, .. } => Op::Sequence(plan),
        };
        let Some(target_field) = binding.target else {
            continue;
        };
        steps.push(Step {
            field: binding.source.name,
            source_ty: binding.source.ty,
            get: binding.source.get,
            set: target_field.set,
            op,
        });
    }

    debug!(
        source = source.name,
        target = target.name,
        bindings = steps.len(),
        skipped,
        "compiled mapper"
    );

    let source_type = source.name;
    let target_type = target.name;
    let instance_check = source.instance_check;
    let binding_count = steps.len();
    let formats = options.formats.clone();

    let func = move |input: &dyn Any,
                     lookup: &dyn MapperLookup|
          -> Result<Box<dyn Any + Send + Sync>, MapError> {
        if instance_check.is_some_and(|check| !check(input)) {
            return Err(MapError::SourceTypeMismatch {
                expected: source_type,
            });
        }
        let mut output = constructor();
        for step in &steps {
            let run = Run {
                source_type,
                target_type,
                field: step.field,
                formats: &formats,
                lookup,
            };
            let value = (step.get)(input).ok_or(MapError::SourceTypeMismatch {
                expected: source_type,
            })?;
            let value = run.apply(step, value)?;
            (step.set)(&mut *output, value).map_err(|e| run.wrap(e))?;
        }
        Ok(output)
    };

    Ok(CompiledMapper::new(
        pair.pair,
        source_type,
        target_type,
        binding_count,
        Box::new(func),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use automapper_core::{
        FieldMeta, FromValue, IntoValue, Mappable, Reflect, TypeHash, TypePair, TypeShape,
    };

    macro_rules! field {
        ($owner:ty, $name:ident : $ty:ty) => {
            FieldMeta::new(
                stringify!($name),
                <$ty as Reflect>::descriptor,
                |obj| {
                    obj.downcast_ref::<$owner>()
                        .map(|o| o.$name.clone().into_value())
                },
                |obj, value| {
                    if let Some(o) = obj.downcast_mut::<$owner>() {
                        o.$name = <$ty>::from_value(value)?;
                    }
                    Ok(())
                },
            )
        };
    }

    macro_rules! mappable {
        ($ty:ident, $path:literal, [$($field:ident : $fty:ty),*]) => {
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor {
                        type_hash: TypeHash::from_name($path),
                        type_name: stringify!($ty),
                        shape: TypeShape::Object { meta: <$ty as Mappable>::type_meta },
                    }
                }
            }

            impl Mappable for $ty {
                fn type_meta() -> TypeMeta {
                    TypeMeta::new(stringify!($ty), $path)
                        .with_instance_check(|obj| obj.is::<$ty>())
                        .with_constructor(|| Box::new(<$ty>::default()))
                        $(.with_field(field!($ty, $field: $fty)))*
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Object(ObjectValue::new(self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Object(obj) => obj.downcast::<Self>(),
                        other => Err(ConversionError::TypeMismatch {
                            expected: stringify!($ty),
                            actual: other.type_name(),
                        }),
                    }
                }
            }
        };
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Inner {
        label: String,
    }
    mappable!(Inner, "tests::Inner", [label: String]);

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Outer {
        id: i32,
        ratio: f64,
        inner: Inner,
        items: Vec<Inner>,
    }
    mappable!(Outer, "tests::Outer", [id: i32, ratio: f64, inner: Inner, items: Vec<Inner>]);

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Flat {
        id: i64,
        ratio: i32,
        inner: Inner,
        items: Vec<Inner>,
    }
    mappable!(Flat, "tests::Flat", [id: i64, ratio: i32, inner: Inner, items: Vec<Inner>]);

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Disjoint {
        unrelated: bool,
    }
    mappable!(Disjoint, "tests::Disjoint", [unrelated: bool]);

    /// Minimal lookup that compiles on demand with empty configuration.
    #[derive(Default)]
    struct TestLookup {
        built: Mutex<HashMap<TypePair, Arc<CompiledMapper>>>,
    }

    impl MapperLookup for TestLookup {
        fn mapper(&self, pair: &PairRef) -> Result<Arc<CompiledMapper>, MapError> {
            if let Some(found) = self.built.lock().unwrap().get(&pair.pair) {
                return Ok(Arc::clone(found));
            }
            let mapper = Arc::new(compile(
                pair,
                &(pair.source)(),
                &(pair.target)(),
                &MappingConfig::new(),
                &CompileOptions::default(),
            )?);
            self.built
                .lock()
                .unwrap()
                .insert(pair.pair, Arc::clone(&mapper));
            Ok(mapper)
        }
    }

    fn build<S: Mappable, T: Mappable>(config: &MappingConfig) -> Result<CompiledMapper, MapError> {
        compile(
            &PairRef::of::<S, T>(),
            &S::type_meta(),
            &T::type_meta(),
            config,
            &CompileOptions::default(),
        )
    }

    fn sample() -> Outer {
        Outer {
            id: 7,
            ratio: 2.9,
            inner: Inner {
                label: "in".to_string(),
            },
            items: vec![
                Inner {
                    label: "a".to_string(),
                },
                Inner {
                    label: "b".to_string(),
                },
            ],
        }
    }

    #[test]
    fn identity_mapping_is_deep_copy() {
        let mapper = build::<Outer, Outer>(&MappingConfig::new()).unwrap();
        let out: Outer = mapper.map(&sample(), &TestLookup::default()).unwrap();
        assert_eq!(out, sample());
        assert_eq!(mapper.binding_count(), 4);
    }

    #[test]
    fn conversions_and_nested() {
        let mapper = build::<Outer, Flat>(&MappingConfig::new()).unwrap();
        let out: Flat = mapper.map(&sample(), &TestLookup::default()).unwrap();
        assert_eq!(out.id, 7);
        assert_eq!(out.ratio, 2);
        assert_eq!(out.inner.label, "in");
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[1].label, "b");
    }

    #[test]
    fn converter_is_applied() {
        let mut config = MappingConfig::new();
        config.set_converter("ratio", Converter::new(|r: f64| (r * 10.0) as i32));
        let mapper = build::<Outer, Flat>(&config).unwrap();
        let out: Flat = mapper.map(&sample(), &TestLookup::default()).unwrap();
        assert_eq!(out.ratio, 29);
    }

    #[test]
    fn converter_with_wrong_input_fails_at_map_time() {
        let mut config = MappingConfig::new();
        config.set_converter("id", Converter::new(|s: String| s.len() as i64));
        let mapper = build::<Outer, Flat>(&config).unwrap();
        let err = mapper
            .map::<Outer, Flat>(&sample(), &TestLookup::default())
            .unwrap_err();
        match err {
            MapError::Conversion { field, source, .. } => {
                assert_eq!(field, "id");
                assert!(matches!(source, ConversionError::ConverterInput { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn converter_output_cast_failure() {
        let mut config = MappingConfig::new();
        config.set_converter("id", Converter::new(|_: i32| "text".to_string()));
        let mapper = build::<Outer, Flat>(&config).unwrap();
        let err = mapper
            .map::<Outer, Flat>(&sample(), &TestLookup::default())
            .unwrap_err();
        assert!(err.is_conversion());
    }

    #[test]
    fn overflow_is_conversion_error() {
        let mapper = build::<Outer, Flat>(&MappingConfig::new()).unwrap();
        let mut source = sample();
        source.ratio = 1e12;
        let err = mapper
            .map::<Outer, Flat>(&source, &TestLookup::default())
            .unwrap_err();
        assert!(err.is_conversion());
    }

    #[test]
    fn missing_constructor() {
        let target = TypeMeta::new("Locked", "tests::Locked");
        let err = compile(
            &PairRef::of::<Outer, Outer>(),
            &Outer::type_meta(),
            &target,
            &MappingConfig::new(),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, MapError::Construction { target: "Locked" });
    }

    #[test]
    fn wrong_source_type() {
        let mapper = build::<Outer, Flat>(&MappingConfig::new()).unwrap();
        let err = mapper
            .map_any(&Inner::default(), &TestLookup::default())
            .unwrap_err();
        assert_eq!(err, MapError::SourceTypeMismatch { expected: "Outer" });
    }

    #[test]
    fn wrong_source_type_without_bindings() {
        let mapper = build::<Inner, Disjoint>(&MappingConfig::new()).unwrap();
        assert_eq!(mapper.binding_count(), 0);

        let out: Disjoint = mapper
            .map(&Inner::default(), &TestLookup::default())
            .unwrap();
        assert_eq!(out, Disjoint::default());

        let err = mapper
            .map_any(&"not an inner", &TestLookup::default())
            .unwrap_err();
        assert_eq!(err, MapError::SourceTypeMismatch { expected: "Inner" });
    }
}
