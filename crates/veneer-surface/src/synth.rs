//! Surface synthesis.
//!
//! Consumes a declaration model plus naming classifications and computes the
//! full set of generated classes, methods, properties, and iteration
//! helpers. Synthesis is a single pass over the model in registration order;
//! the result is deterministic for a fixed model, convention, registry, and
//! collision policy.

use std::collections::BTreeMap;

use log::{debug, warn};
use veneer_model::{
    ApiManifest, ApiModel, ConstantDecl, EnumDecl, FunctionDecl, NamingConvention,
    OwnerTypeRegistry, TypeRef,
};

use crate::error::{Result, SurfaceError};
use crate::naming::{classify, method_name, Role};
use crate::surface::{ClassSurface, IteratorEntry, MethodEntry, PropertyEntry, Surface};

/// What to do when two declarations synthesize the same entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The later-registered declaration replaces the earlier one. Stable for
    /// a fixed registration order; each replacement is logged.
    #[default]
    Replace,
    /// Fail synthesis on the first collision.
    Fail,
}

/// Synthesize the binding surface for one API version.
///
/// Every function declaration yields exactly one baseline [`MethodEntry`]:
/// on the class its first parameter resolves to, or in the global namespace.
/// Property and iterator entries are derived overlays and never remove the
/// baseline method.
pub fn synthesize(
    model: &ApiModel,
    convention: &NamingConvention,
    registry: &OwnerTypeRegistry,
    policy: CollisionPolicy,
) -> Result<Surface> {
    let functions: Vec<&FunctionDecl> = model.functions().collect();

    let takes_opaque = functions
        .iter()
        .any(|f| f.receiver_type().and_then(TypeRef::opaque_name).is_some());
    if registry.is_empty() && takes_opaque {
        return Err(SurfaceError::RegistryEmpty);
    }

    let mut classes: BTreeMap<String, ClassSurface> = registry
        .names()
        .iter()
        .map(|n| (n.clone(), ClassSurface::new(n.clone())))
        .collect();
    let mut globals: Vec<MethodEntry> = Vec::new();

    // (class → property name → (getter, setter)) accumulated alongside the
    // baseline pass so slot replacement follows method replacement.
    type Slots = BTreeMap<String, (Option<FunctionDecl>, Option<FunctionDecl>)>;
    let mut props: BTreeMap<String, Slots> = BTreeMap::new();

    for f in &functions {
        let first_opaque = f.receiver_type().and_then(TypeRef::opaque_name);
        let receiver = first_opaque
            .filter(|n| registry.contains(n))
            .map(str::to_string);
        if receiver.is_none() {
            if let Some(unknown) = first_opaque {
                // Unresolved owner type: degrade to the global namespace.
                debug!("owner type '{unknown}' of '{}' is not registered", f.name);
            }
        }
        let stripped = f
            .name
            .strip_prefix(convention.prefix.as_str())
            .unwrap_or(&f.name);
        let name = method_name(receiver.as_deref(), stripped);

        let entry = MethodEntry {
            owner_type: receiver.clone(),
            method_name: name.clone(),
            backing: (*f).clone(),
        };

        let methods = match &receiver {
            Some(class) => {
                &mut classes
                    .entry(class.clone())
                    .or_insert_with(|| ClassSurface::new(class.clone()))
                    .methods
            }
            None => &mut globals,
        };

        if let Some(pos) = methods.iter().position(|m| m.method_name == name) {
            let owner = receiver.clone().unwrap_or_else(|| "global".to_string());
            match policy {
                CollisionPolicy::Fail => {
                    return Err(SurfaceError::MethodCollision {
                        owner,
                        method: name,
                        first: methods[pos].backing.name.clone(),
                        second: f.name.clone(),
                    });
                }
                CollisionPolicy::Replace => {
                    warn!(
                        "method '{}' on '{}': '{}' replaces '{}'",
                        name, owner, f.name, methods[pos].backing.name
                    );
                    methods[pos] = entry;
                }
            }
        } else {
            methods.push(entry);
        }

        // Accessor overlay: a zero-argument getter and/or a one-argument
        // setter claim a property slot under the name they share.
        if let Some(class) = &receiver {
            let classification = classify(&f.name, convention, registry);
            let arity = f.parameters.len().saturating_sub(1);
            let slot = match classification.role {
                Role::Getter if arity == 0 => name.strip_prefix("get_").map(|p| (p, true)),
                Role::Setter if arity == 1 => name.strip_prefix("set_").map(|p| (p, false)),
                _ => None,
            };
            if let Some((prop, is_getter)) = slot.filter(|(p, _)| !p.is_empty()) {
                let slots = props.entry(class.clone()).or_default();
                let pair = slots.entry(prop.to_string()).or_default();
                let occupied = if is_getter { &mut pair.0 } else { &mut pair.1 };
                if let Some(previous) = occupied {
                    match policy {
                        CollisionPolicy::Fail => {
                            return Err(SurfaceError::PropertyCollision {
                                owner: class.clone(),
                                property: prop.to_string(),
                            });
                        }
                        CollisionPolicy::Replace => {
                            warn!(
                                "property '{}' on '{}': '{}' replaces '{}'",
                                prop, class, f.name, previous.name
                            );
                        }
                    }
                }
                *occupied = Some((*f).clone());
            }
        }
    }

    for (class, slots) in props {
        let surface = classes
            .entry(class.clone())
            .or_insert_with(|| ClassSurface::new(class.clone()));
        for (prop, (getter, setter)) in slots {
            surface.properties.push(PropertyEntry {
                owner_type: class.clone(),
                property_name: prop,
                getter,
                setter,
            });
        }
    }

    for ((owner, _), entry) in derive_iterators(&functions, convention, registry) {
        classes
            .entry(owner.clone())
            .or_insert_with(|| ClassSurface::new(owner))
            .iterators
            .push(entry);
    }

    let mut enums: Vec<EnumDecl> = Vec::new();
    for e in model.enums() {
        enums.push(EnumDecl {
            name: strip_decl_prefix(&e.name, &convention.prefix).to_string(),
            variants: e
                .variants
                .iter()
                .map(|(n, v)| (strip_decl_prefix(n, &convention.prefix).to_string(), *v))
                .collect(),
        });
    }
    let constants: Vec<ConstantDecl> = model
        .constants()
        .map(|c| ConstantDecl {
            name: strip_decl_prefix(&c.name, &convention.prefix).to_string(),
            value: c.value,
        })
        .collect();

    let surface = Surface {
        api_name: String::new(),
        classes,
        globals,
        enums,
        constants,
    };
    debug!(
        "synthesized surface: {} classes, {} methods, {} properties, {} iterators, {} globals",
        surface.classes.len(),
        surface.method_count(),
        surface.property_count(),
        surface.iterator_count(),
        surface.globals.len()
    );
    Ok(surface)
}

/// Synthesize directly from a loaded manifest.
pub fn synthesize_api(manifest: &ApiManifest, policy: CollisionPolicy) -> Result<Surface> {
    let mut surface = synthesize(&manifest.model, &manifest.convention, &manifest.registry, policy)?;
    surface.api_name = manifest.name.clone();
    Ok(surface)
}

/// Pair next-sibling steps with their first-element getters.
///
/// A next step is a unary function whose parameter and return types are the
/// same registered opaque type. Its first step is a getter, on any class,
/// with the same result type and a name segment ending in the step's own
/// ("GetInstruction" or "GetFirstInstruction" both start a
/// "GetNextInstruction" chain). A step with no getter anywhere iterates its
/// own receiver chain, doubling as its first step.
fn derive_iterators(
    functions: &[&FunctionDecl],
    convention: &NamingConvention,
    registry: &OwnerTypeRegistry,
) -> BTreeMap<(String, String), IteratorEntry> {
    let mut iterators: BTreeMap<(String, String), IteratorEntry> = BTreeMap::new();

    for f in functions {
        if classify(&f.name, convention, registry).role != Role::NextIteratorStep {
            continue;
        }
        if f.parameters.len() != 1 || f.parameters[0].ty != f.return_type {
            continue;
        }
        let element = match f.return_type.opaque_name() {
            Some(name) if registry.contains(name) => name,
            _ => continue,
        };
        let Some(segment) = step_segment(&f.name, convention) else {
            continue;
        };
        if segment.is_empty() {
            continue;
        }

        let mut emitted = false;
        for g in functions {
            let Some(owner) = g
                .receiver_type()
                .and_then(TypeRef::opaque_name)
                .filter(|n| registry.contains(n))
            else {
                continue;
            };
            if classify(&g.name, convention, registry).role != Role::Getter {
                continue;
            }
            if g.parameters.len() != 1 || g.return_type != f.return_type {
                continue;
            }
            let Some(g_segment) = getter_segment(&g.name, convention) else {
                continue;
            };
            if !g_segment.ends_with(segment) {
                continue;
            }

            let iterated = method_name(Some(owner), segment);
            iterators
                .entry((owner.to_string(), iterated.clone()))
                .or_insert_with(|| IteratorEntry {
                    owner_type: owner.to_string(),
                    iterated_name: iterated,
                    first_step: (*g).clone(),
                    next_step: (*f).clone(),
                });
            emitted = true;
        }

        if !emitted {
            let iterated = method_name(Some(element), segment);
            iterators
                .entry((element.to_string(), iterated.clone()))
                .or_insert_with(|| IteratorEntry {
                    owner_type: element.to_string(),
                    iterated_name: iterated,
                    first_step: (*f).clone(),
                    next_step: (*f).clone(),
                });
        }
    }

    iterators
}

/// The name segment after prefix + getter marker + next marker.
fn step_segment<'a>(name: &'a str, convention: &NamingConvention) -> Option<&'a str> {
    name.strip_prefix(convention.prefix.as_str())?
        .strip_prefix(convention.getter_marker.as_str())?
        .strip_prefix(convention.next_marker.as_str())
}

/// The name segment after prefix + getter marker.
fn getter_segment<'a>(name: &'a str, convention: &NamingConvention) -> Option<&'a str> {
    name.strip_prefix(convention.prefix.as_str())?
        .strip_prefix(convention.getter_marker.as_str())
}

/// Strip the API prefix from an enum or constant name, keeping names like
/// `LLVM_IS_A` that continue with an underscore untouched.
fn strip_decl_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    match name.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() && !rest.starts_with('_') => rest,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_model::{ApiManifest, Declaration, Parameter};

    fn manifest(toml: &str) -> ApiManifest {
        ApiManifest::parse(toml).unwrap()
    }

    fn synth(m: &ApiManifest) -> Surface {
        synthesize(&m.model, &m.convention, &m.registry, CollisionPolicy::Replace).unwrap()
    }

    const LLVM_SUBSET: &str = r#"
[api]
name = "llvm"
prefix = "LLVM"
version = "18.1"

types = ["Module", "Value", "BasicBlock"]

[[functions]]
signature = "void LLVMDumpValue(Value* v)"

[[functions]]
signature = "const char* LLVMGetValueName(Value* v)"

[[functions]]
signature = "void LLVMSetValueName(Value* v, const char* name)"

[[functions]]
signature = "Value* LLVMGetFirstInstruction(BasicBlock* bb)"

[[functions]]
signature = "Value* LLVMGetNextInstruction(Value* v)"

[[functions]]
signature = "Module* LLVMModuleCreateWithName(const char* id)"
"#;

    #[test]
    fn baseline_methods_placed_by_receiver() {
        let m = manifest(LLVM_SUBSET);
        let surface = synth(&m);

        let value = surface.class("Value").unwrap();
        assert!(value.method("dump").is_some());
        assert!(value.method("get_name").is_some());
        assert!(value.method("set_name").is_some());

        // No receiver: global namespace, full snake name.
        assert!(surface.global("module_create_with_name").is_some());
    }

    #[test]
    fn overlays_keep_baseline_methods() {
        let m = manifest(LLVM_SUBSET);
        let surface = synth(&m);
        let value = surface.class("Value").unwrap();

        let prop = value.property("name").unwrap();
        assert!(prop.getter.is_some());
        assert!(prop.setter.is_some());
        // The baseline accessor methods survive next to the property.
        assert!(value.method("get_name").is_some());
        assert!(value.method("set_name").is_some());
    }

    #[test]
    fn iterator_paired_with_first_getter() {
        let m = manifest(LLVM_SUBSET);
        let surface = synth(&m);

        let bb = surface.class("BasicBlock").unwrap();
        let it = bb.iterator("instruction").unwrap();
        assert_eq!(it.first_step.name, "LLVMGetFirstInstruction");
        assert_eq!(it.next_step.name, "LLVMGetNextInstruction");
    }

    #[test]
    fn read_only_property() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Module"]

[[functions]]
signature = "const char* LLVMGetModuleIdentifier(Module* m)"
"#,
        );
        let surface = synth(&m);
        let prop = surface.class("Module").unwrap().property("identifier").unwrap();
        assert!(prop.is_read_only());
    }

    #[test]
    fn getter_with_arguments_is_not_a_property() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Value"]

[[functions]]
signature = "Value* LLVMGetOperand(Value* v, unsigned index)"
"#,
        );
        let surface = synth(&m);
        let value = surface.class("Value").unwrap();
        assert!(value.method("get_operand").is_some());
        assert!(value.properties.is_empty());
    }

    #[test]
    fn unresolved_receiver_degrades_to_global() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Module"]

[[functions]]
signature = "void LLVMShutdown(int code)"
"#,
        );
        let surface = synth(&m);
        assert!(surface.global("shutdown").is_some());
    }

    #[test]
    fn unregistered_opaque_receiver_degrades_to_global() {
        let mut model = ApiModel::new();
        model
            .push(Declaration::Function(FunctionDecl {
                name: "LLVMDumpWidget".to_string(),
                parameters: vec![Parameter {
                    name: "w".to_string(),
                    ty: TypeRef::pointer_to(TypeRef::Opaque("Widget".to_string())),
                }],
                return_type: TypeRef::VOID,
            }))
            .unwrap();
        let registry = OwnerTypeRegistry::from_names(["Module"]);
        let convention = NamingConvention::new("LLVM");

        let surface = synthesize(&model, &convention, &registry, CollisionPolicy::Replace).unwrap();
        assert!(surface.global("dump_widget").is_some());
        assert!(surface.class("Widget").is_none());
    }

    #[test]
    fn empty_registry_fails_fast() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Module"]

[[functions]]
signature = "void LLVMDumpModule(Module* m)"
"#,
        );
        let empty = OwnerTypeRegistry::new();
        let err = synthesize(&m.model, &m.convention, &empty, CollisionPolicy::Replace).unwrap_err();
        assert!(matches!(err, SurfaceError::RegistryEmpty));
    }

    #[test]
    fn empty_registry_without_opaque_parameters_is_fine() {
        let m = manifest(
            r#"
[api]
name = "libm"
prefix = "Lm"

[[functions]]
signature = "double LmSin(double x)"
"#,
        );
        let surface = synth(&m);
        assert!(surface.global("sin").is_some());
    }

    #[test]
    fn synthesis_is_idempotent() {
        let m = manifest(LLVM_SUBSET);
        let a = synth(&m);
        let b = synth(&m);
        assert_eq!(a, b);
    }

    #[test]
    fn collision_replace_is_last_write_wins() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Value"]

[[functions]]
signature = "void LLVMDumpValue(Value* v)"

[[functions]]
signature = "int LLVMDump(Value* v)"
"#,
        );
        // Both normalize to `dump` on Value; the later registration wins.
        let surface = synth(&m);
        let value = surface.class("Value").unwrap();
        assert_eq!(value.methods.len(), 1);
        assert_eq!(value.method("dump").unwrap().backing.name, "LLVMDump");
    }

    #[test]
    fn collision_fail_policy_reports() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"
types = ["Value"]

[[functions]]
signature = "void LLVMDumpValue(Value* v)"

[[functions]]
signature = "int LLVMDump(Value* v)"
"#,
        );
        let err =
            synthesize(&m.model, &m.convention, &m.registry, CollisionPolicy::Fail).unwrap_err();
        match err {
            SurfaceError::MethodCollision { owner, method, first, second } => {
                assert_eq!(owner, "Value");
                assert_eq!(method, "dump");
                assert_eq!(first, "LLVMDumpValue");
                assert_eq!(second, "LLVMDump");
            }
            other => panic!("expected MethodCollision, got {other:?}"),
        }
    }

    #[test]
    fn self_chained_iterator() {
        // The GetNextFoo-only shape: no first getter anywhere, so the step
        // doubles as the first step and the chain hangs off the receiver.
        let m = manifest(
            r#"
[api]
name = "demo"
prefix = "LLVM"
types = ["Foo"]

[[functions]]
signature = "Foo* LLVMCreate()"

[[functions]]
signature = "void LLVMSetBar(Foo* f, int value)"

[[functions]]
signature = "int LLVMGetBar(Foo* f)"

[[functions]]
signature = "Foo* LLVMGetNextFoo(Foo* f)"
"#,
        );
        let surface = synth(&m);

        assert!(surface.global("create").is_some());

        let foo = surface.class("Foo").unwrap();
        let prop = foo.property("bar").unwrap();
        assert!(prop.getter.is_some() && prop.setter.is_some());

        let it = foo.iterator("foo").unwrap();
        assert_eq!(it.first_step.name, "LLVMGetNextFoo");
        assert_eq!(it.next_step.name, "LLVMGetNextFoo");
    }

    #[test]
    fn enum_and_constant_prefix_stripped() {
        let m = manifest(
            r#"
[api]
name = "llvm"
prefix = "LLVM"

[[enums]]
name = "LLVMOpcode"
variants = { LLVMRet = 1, LLVMBr = 2 }

[[constants]]
name = "LLVMAttributeReturnIndex"
value = 0
"#,
        );
        let surface = synth(&m);
        assert_eq!(surface.enums[0].name, "Opcode");
        assert_eq!(surface.enums[0].variants[0], ("Br".to_string(), 2));
        assert_eq!(surface.constants[0].name, "AttributeReturnIndex");
    }
}
