use crate::bundle;
use crate::Compiler;
use crate::BundleError;
use crate::BundleOptions;
use crate::InMemoryCompiler;
use diagnostics::Diagnostic;
use diagnostics::Span;
use diagnostics::TextRange;
use similar::TextDiff;

fn assert_artifact_eq(actual: &str, expected: &str) {
  if actual != expected {
    let diff = TextDiff::from_lines(expected, actual);
    panic!("artifact mismatch:\n{}", diff.unified_diff());
  }
}

#[test]
fn bundles_two_files_under_flattened_identifiers() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("index.ts", "export declare class Foo {\n}\n")
    .with_file("bar.ts", "export declare class Bar {\n}\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert_artifact_eq(
    &artifact,
    "declare module 'pkg' {\n\n  export class Foo {\n  }\n}\n\n\
     declare module 'pkg/bar' {\n\n  export class Bar {\n  }\n}\n\n",
  );
  assert!(!artifact.contains("import main"));
}

#[test]
fn main_option_appends_package_alias_block() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("index.ts", "export declare class Foo {\n}\n")
    .with_file("bar.ts", "export declare class Bar {\n}\n");
  let options = BundleOptions::new("pkg").with_main("./index");
  let artifact = bundle(&options, &mut compiler).unwrap();
  assert!(artifact.ends_with(
    "declare module 'pkg' {\n  import main = require('pkg');\n  export = main;\n}\n"
  ));
}

#[test]
fn non_relative_main_is_used_verbatim() {
  let mut compiler =
    InMemoryCompiler::new().with_file("index.ts", "export declare class Foo {\n}\n");
  let options = BundleOptions::new("pkg").with_main("pkg/extra");
  let artifact = bundle(&options, &mut compiler).unwrap();
  assert!(artifact.contains("import main = require('pkg/extra');"));
}

#[test]
fn relative_references_rewrite_and_external_ones_survive() {
  let mut compiler = InMemoryCompiler::new()
    .with_file(
      "a/b.ts",
      "import { X } from './foo';\nimport { Y } from 'other-package';\nexport declare const v: X;\n",
    )
    .with_file("a/foo.ts", "export declare class X {\n}\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert_artifact_eq(
    &artifact,
    "declare module 'pkg/a/b' {\n\
     \x20\x20import { X } from 'pkg/a/foo'\n\
     \x20\x20import { Y } from 'other-package'\n\
     \x20\x20export const v: X\n\
     }\n\n\
     declare module 'pkg/a/foo' {\n\n\
     \x20\x20export class X {\n\
     \x20\x20}\n\
     }\n\n",
  );
}

#[test]
fn require_references_rewrite_relative_targets_only() {
  let mut compiler = InMemoryCompiler::new()
    .with_file(
      "entry.ts",
      "import helper = require('./lib/helper');\nimport ext = require('outside');\nexport declare const h: typeof helper;\n",
    )
    .with_file("lib/helper.ts", "export declare function help(): void;\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(artifact.contains("import helper = require('pkg/lib/helper')"));
  assert!(artifact.contains("import ext = require('outside')"));
}

#[test]
fn export_from_specifiers_rewrite_through_parent_traversal() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("deep/nested/mod.ts", "export { util } from '../../util';\n")
    .with_file("util.ts", "export declare function util(): void;\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(artifact.contains("declare module 'pkg/deep/nested/mod' {"));
  assert!(artifact.contains("export { util } from 'pkg/util'"));
}

#[test]
fn index_files_collapse_and_their_siblings_resolve() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("widgets/index.ts", "export { W } from './widget';\n")
    .with_file("widgets/widget.ts", "export declare class W {\n}\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(artifact.contains("declare module 'pkg/widgets' {"));
  assert!(artifact.contains("export { W } from 'pkg/widgets/widget'"));
}

#[test]
fn private_members_and_side_effect_imports_never_appear() {
  let mut compiler = InMemoryCompiler::new().with_file(
    "w.ts",
    "import 'polyfill';\ndeclare class A {\n    x: number;\n    private y;\n}\nexport { A };\n",
  );
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(!artifact.contains("polyfill"));
  assert!(!artifact.contains("private"));
  assert!(artifact.contains("x: number"));
}

#[test]
fn empty_declaration_emits_empty_block() {
  let mut compiler = InMemoryCompiler::new().with_file("empty.ts", "");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert_artifact_eq(&artifact, "declare module 'pkg/empty' {\n}\n\n");
}

#[test]
fn pre_existing_declaration_files_are_skipped() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("index.ts", "export declare class Foo {\n}\n")
    .with_file("vendor.d.ts", "declare const vendor: unknown;\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(!artifact.contains("vendor"));
}

#[test]
fn strip_exports_removes_redundant_export_keywords() {
  let mut compiler =
    InMemoryCompiler::new().with_file("index.ts", "export declare class Foo {\n}\n");
  let mut options = BundleOptions::new("pkg");
  options.strip_exports = true;
  let artifact = bundle(&options, &mut compiler).unwrap();
  assert_artifact_eq(&artifact, "declare module 'pkg' {\n\n  class Foo {\n  }\n}\n\n");
}

#[test]
fn semicolons_inside_string_literal_types_survive_stripping() {
  let mut compiler =
    InMemoryCompiler::new().with_file("s.ts", "export declare const sep: ';';\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  assert!(artifact.contains("sep: ';'"));
  assert!(!artifact.contains("';';"));
}

#[test]
fn pre_emit_diagnostics_fail_during_compilation() {
  let mut compiler =
    InMemoryCompiler::new().with_file("index.ts", "export declare class Foo {\n}\n");
  compiler.add_pre_emit_diagnostic(
    Diagnostic::error(2304, "Cannot find name 'Bar'.").with_span(Span::new(
      compiler.source_files()[0].id,
      TextRange::new(0, 1),
    )),
  );
  let err = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap_err();
  match &err {
    BundleError::Compilation { message, diagnostics } => {
      assert_eq!(diagnostics.len(), 1);
      assert_eq!(
        message,
        "Declaration generation failed\n\
         index.ts(1,1): error TS2304: Cannot find name 'Bar'."
      );
    }
    other => panic!("expected compilation error, got {:?}", other),
  }
}

#[test]
fn emission_diagnostics_fail_the_run() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("a.ts", "export declare const a: number;\n")
    .with_file("b.ts", "export declare const b: number;\n");
  let files = compiler.source_files();
  compiler.fail_emission("b.ts", vec![Diagnostic::error(
    2322,
    "Type 'string' is not assignable to type 'number'.",
  )
  .with_span(Span::new(files[1].id, TextRange::new(0, 1)))]);
  let err = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap_err();
  assert!(matches!(err, BundleError::Emission { .. }));
  assert!(err
    .to_string()
    .contains("b.ts(1,1): error TS2322: Type 'string' is not assignable to type 'number'."));
}

#[test]
fn malformed_declaration_text_is_an_emission_failure() {
  let mut compiler = InMemoryCompiler::new().with_file("broken.ts", "import './never");
  let err = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap_err();
  match err {
    BundleError::Emission { diagnostics, .. } => assert_eq!(diagnostics[0].code, 1002),
    other => panic!("expected emission error, got {:?}", other),
  }
}

#[test]
fn identifier_collisions_are_fatal_at_finalize() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("foo.ts", "export declare const a: number;\n")
    .with_file("foo/index.ts", "export declare const b: number;\n");
  let err = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap_err();
  match err {
    BundleError::Resolution { collisions, .. } => {
      assert_eq!(collisions.len(), 1);
      assert_eq!(collisions[0].id, "pkg/foo");
    }
    other => panic!("expected resolution error, got {:?}", other),
  }
}

#[test]
fn unresolved_relative_references_are_fatal_at_finalize() {
  let mut compiler =
    InMemoryCompiler::new().with_file("b.ts", "import { X } from './missing';\n");
  let err = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap_err();
  match err {
    BundleError::Resolution { unresolved, .. } => {
      assert_eq!(unresolved.len(), 1);
      assert_eq!(unresolved[0].file, "b.ts");
      assert_eq!(unresolved[0].specifier, "./missing");
    }
    other => panic!("expected resolution error, got {:?}", other),
  }
}

#[test]
fn unresolvable_relative_main_is_a_resolution_failure() {
  let mut compiler =
    InMemoryCompiler::new().with_file("index.ts", "export declare class Foo {\n}\n");
  let options = BundleOptions::new("pkg").with_main("./nope");
  let err = bundle(&options, &mut compiler).unwrap_err();
  assert!(matches!(err, BundleError::Resolution { .. }));
  assert!(err.to_string().contains("./nope"));
}

#[test]
fn missing_name_fails_before_compilation() {
  let mut compiler =
    InMemoryCompiler::new().with_file("index.ts", "export declare class Foo {\n}\n");
  let err = bundle(&BundleOptions::default(), &mut compiler).unwrap_err();
  assert!(matches!(err, BundleError::Configuration(_)));
}

#[test]
fn repeated_runs_are_byte_identical() {
  let build = || {
    InMemoryCompiler::new()
      .with_file("index.ts", "export declare class Foo {\n}\n")
      .with_file("a/b.ts", "export { Foo } from '../index';\n")
  };
  let options = BundleOptions::new("pkg").with_main("./index");
  let first = bundle(&options, &mut build()).unwrap();
  let second = bundle(&options, &mut build()).unwrap();
  assert_eq!(first, second);
}

#[test]
fn blocks_appear_in_emission_order() {
  let mut compiler = InMemoryCompiler::new()
    .with_file("zz.ts", "export declare const z: number;\n")
    .with_file("aa.ts", "export declare const a: number;\n");
  let artifact = bundle(&BundleOptions::new("pkg"), &mut compiler).unwrap();
  let zz = artifact.find("declare module 'pkg/zz'").unwrap();
  let aa = artifact.find("declare module 'pkg/aa'").unwrap();
  assert!(zz < aa);
}
