// Dweve DictExpr - Structured queries over nested JSON documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Built-in equivalence cases.
//!
//! Each case pairs a DictExpr expression with the JMESPath query it must
//! agree with. Cases without a fixed document run against the generated
//! store document and are timed in full mode; the rest pin a small document
//! whose shape the query depends on and are only checked.

use crate::core::registry::CaseRegistry;
use crate::datasets::{mixed_document, user_document};
use crate::error::Result;
use dictexpr_core::{field, identity, lit, merge, not_null, select_dict, select_list, Expr};
use serde_json::Value;

fn meta(key: &str) -> Expr {
    field("metadata").field(key)
}

fn deep_o() -> Expr {
    meta("l").field("m").field("n").field("o")
}

/// The default case catalogue.
///
/// # Errors
///
/// Fails only if the catalogue itself is malformed (duplicate or empty
/// names).
pub fn default_cases() -> Result<CaseRegistry<Expr>> {
    CaseRegistry::builder()
        // Navigation
        .case(
            "field.subfield.index.field",
            meta("a").field("b").index(0).field("c"),
            "metadata.a.b[0].c",
        )
        .case(
            "simple-field-access",
            field("users").index(0).field("name"),
            "users[0].name",
        )
        .case(
            "negative-index",
            field("products").index(-1).field("product_id"),
            "products[-1].product_id",
        )
        .case(
            "slice-array",
            field("users")
                .slice(Some(1), Some(10), Some(2))
                .project(field("id")),
            "users[1:10:2].id",
        )
        .case(
            "reverse-slice",
            meta("m").slice(None, None, Some(-1)),
            "metadata.m[::-1]",
        )
        .case("tag-lookup", field("tags").field("popular"), "tags.popular")
        // Projections
        .case(
            "list-projection",
            field("users").project(field("name")),
            "users[*].name",
        )
        .case(
            "nested-projection",
            field("users").project(field("address").field("city")),
            "users[*].address.city",
        )
        .case(
            "object-projection",
            meta("d").project_values(field("e")),
            "metadata.d.*.e",
        )
        .case("flatten-nested-list", meta("i").flatten(), "metadata.i[]")
        .case(
            "flatten-scores",
            field("users").index(0).field("nested_scores").flatten(),
            "users[0].nested_scores[]",
        )
        .case(
            "pipe-to-length",
            field("users").pipe(identity().length()),
            "users | length(@)",
        )
        // Filters and comparisons
        .case(
            "filter-age-and-active",
            field("users")
                .filter(field("age").ge(30).and(field("active").eq(true)))
                .project(field("name")),
            "users[?age >= `30` && active == `true`].name",
        )
        .case(
            "filter-in-stock",
            field("products")
                .filter(field("in_stock"))
                .project(field("name")),
            "products[?in_stock].name",
        )
        .case(
            "filter-cheap-products",
            field("products")
                .filter(field("price").lt(20))
                .project(field("product_id")),
            "products[?price < `20`].product_id",
        )
        .case(
            "filter-contains-category",
            field("users")
                .filter(field("category").contains("VIP"))
                .project(field("id")),
            "users[?contains(category, `\"VIP\"`)].id",
        )
        .case(
            "filter-shipped-amounts",
            field("sales")
                .index(0)
                .filter(field("shipped").not())
                .project(field("amount")),
            "sales[0][?!shipped].amount",
        )
        .case(
            "numeric-comparison-eq",
            meta("j").index(1).eq(1),
            "metadata.j[1] == `1`",
        )
        .case(
            "boolean-comparison-eq",
            meta("k").index(0).eq(true),
            "metadata.k[0] == `true`",
        )
        .case(
            "number-vs-bool-eq",
            meta("j").index(0).eq(false),
            "metadata.j[0] == `false`",
        )
        .case(
            "and-or-not-logic",
            deep_o().gt(1).and(deep_o().eq(5).not()).or(0),
            "(metadata.l.m.n.o > `1` && !(metadata.l.m.n.o == `5`)) || `0`",
        )
        // Multi-select
        .case(
            "multiselect-dict",
            select_dict([
                ("names", field("users").project(field("name"))),
                ("count", field("users").length()),
            ]),
            "{names: users[*].name, count: length(users)}",
        )
        .case(
            "multiselect-list",
            select_list([field("users").index(0), field("products").index(0)]),
            "[users[0], products[0]]",
        )
        // Functions
        .case("keys-function", meta("d").keys(), "keys(metadata.d)")
        .case("values-function", meta("d").values(), "values(metadata.d)")
        .case("length-function", field("users").length(), "length(users)")
        .case(
            "map-length",
            field("users")
                .project(field("name"))
                .map_with(identity().length()),
            "map(&length(@), users[*].name)",
        )
        .case(
            "max_by-price",
            field("products").max_by(field("price")).field("name"),
            "max_by(products, &price).name",
        )
        .case(
            "sort_by-price",
            field("products")
                .sort_by(field("price"))
                .project(field("product_id")),
            "sort_by(products, &price)[*].product_id",
        )
        .case("sort-function", meta("h").sort(), "sort(metadata.h)")
        .case("to_array-function", meta("a").to_array(), "to_array(metadata.a)")
        .case(
            "to_string-function",
            meta("d").to_json_string(),
            "to_string(metadata.d)",
        )
        .case(
            "to_number-function",
            lit("42").to_number(),
            "to_number(`\"42\"`)",
        )
        .case(
            "abs-function",
            meta("h").map_with(identity().abs()),
            "map(&abs(@), metadata.h)",
        )
        .case("avg-function", meta("h").avg(), "avg(metadata.h)")
        .case(
            "ceil-function",
            meta("h").map_with(identity().ceil()),
            "map(&ceil(@), metadata.h)",
        )
        .case(
            "floor-function",
            meta("h").map_with(identity().floor()),
            "map(&floor(@), metadata.h)",
        )
        .case("max-function", meta("h").max(), "max(metadata.h)")
        .case("min-function", meta("h").min(), "min(metadata.h)")
        .case("reverse-function", meta("h").reverse(), "reverse(metadata.h)")
        .case("sum-function", meta("h").sum(), "sum(metadata.h)")
        .case(
            "sum-day-amounts",
            field("sales").index(0).project(field("amount")).sum(),
            "sum(sales[0][*].amount)",
        )
        .case("type-function", meta("a").type_of(), "type(metadata.a)")
        .case(
            "contains-function",
            meta("h").contains(5.5),
            "contains(metadata.h, `5.5`)",
        )
        .case(
            "ends_with-function",
            lit("hello").ends_with("lo"),
            "ends_with(`\"hello\"`, `\"lo\"`)",
        )
        .case(
            "starts_with-function",
            lit("hello").starts_with("he"),
            "starts_with(`\"hello\"`, `\"he\"`)",
        )
        .case(
            "join-function",
            meta("m").join(", "),
            "join(`\", \"`, metadata.m)",
        )
        .case(
            "merge-function",
            merge([meta("d"), meta("l")]),
            "merge(metadata.d, metadata.l)",
        )
        .case(
            "not_null-function",
            not_null([lit(Value::Null), lit("a"), lit("b")]),
            "not_null(`null`, `\"a\"`, `\"b\"`)",
        )
        // Pinned documents: results depend on ties or shapes the store
        // document does not have.
        .case_on(
            "min_by-age",
            field("users").min_by(field("age")),
            "min_by(users, &age)",
            user_document(),
        )
        .case_on(
            "max_by-age",
            field("users").max_by(field("age")),
            "max_by(users, &age)",
            user_document(),
        )
        .case_on(
            "sort_by-age",
            field("users").sort_by(field("age")).project(field("name")),
            "sort_by(users, &age)[*].name",
            user_document(),
        )
        .case_on(
            "filter-adults",
            field("users")
                .filter(field("age").ge(18))
                .project(field("name")),
            "users[?age >= `18`].name",
            user_document(),
        )
        .case_on(
            "value-projection-sort",
            field("stats").values().sort(),
            "sort(values(stats))",
            mixed_document(),
        )
        .case_on(
            "multiselect-stats",
            select_dict([
                ("a", field("stats").field("a")),
                ("b", field("stats").field("b")),
            ]),
            "{a: stats.a, b: stats.b}",
            mixed_document(),
        )
        .case_on(
            "length-of-path",
            field("foo").field("bar").length(),
            "length(foo.bar)",
            mixed_document(),
        )
        .case_on(
            "slice-middle",
            field("arr").slice(Some(1), Some(3), None),
            "arr[1:3]",
            mixed_document(),
        )
        .case_on(
            "flatten-mixed",
            field("nested").flatten(),
            "nested[]",
            mixed_document(),
        )
        .case_on(
            "to_string-object",
            field("stats").to_json_string(),
            "to_string(stats)",
            mixed_document(),
        )
        .build()
}
