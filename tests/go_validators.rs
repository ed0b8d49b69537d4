use serde_json::json;
use thrift_vgen::{generate_struct, Codegen, CodegenError, Document};

fn document() -> Document {
    thrift_vgen::path_de::from_value_with_path(json!({
        "package": "shop",
        "structs": [
            {
                "name": "order_line",
                "fields": [
                    { "id": 1, "name": "sku", "type": "string", "requiredness": "required",
                      "annotations": { "vt.min_size": ["3"], "vt.pattern": ["^[A-Z0-9-]+$"] } },
                    { "id": 2, "name": "quantity", "type": { "integer": { "width": 32 } },
                      "annotations": { "vt.gt": ["0"], "vt.le": ["$max_quantity"] } },
                    { "id": 3, "name": "max_quantity", "type": { "integer": { "width": 32 } } },
                    { "id": 4, "name": "status", "type": { "enum": { "name": "Status" } }, "requiredness": "optional",
                      "annotations": { "vt.defined_only": ["true"] } }
                ]
            },
            {
                "name": "Order",
                "fields": [
                    { "id": 1, "name": "lines", "type": { "list": { "elem": { "struct": { "name": "OrderLine" } } } },
                      "annotations": { "vt.min_size": ["1"], "vt.elem.skip": ["false"] } },
                    { "id": 2, "name": "buckets", "type": { "list": { "elem": { "list": { "elem": { "integer": { "width": 64 } } } } } },
                      "annotations": { "vt.elem.elem.not_in": ["0"], "vt.elem.max_size": ["@len($lines)"] } },
                    { "id": 3, "name": "labels", "type": { "map": { "key": "string", "value": "binary" } },
                      "annotations": { "vt.key.prefix": ["x-"], "vt.value.max_size": ["64"] } },
                    { "id": 4, "name": "customer", "type": { "struct": { "name": "Customer" } },
                      "annotations": { "vt.skip": ["false", "true"] } },
                    { "id": 5, "name": "draft", "type": "bool" },
                    { "id": 6, "name": "billing", "type": { "struct": { "name": "Address" } },
                      "annotations": { "vt.skip": ["$draft"] } }
                ]
            }
        ]
    }))
    .unwrap()
}

fn render(doc: &Document) -> String {
    let mut cg = Codegen::new();
    for strukt in &doc.structs {
        cg.emit(strukt).unwrap();
    }
    cg.into_file(&doc.package)
}

#[test]
fn renders_complete_go_file() {
    let file = render(&document());

    assert!(file.starts_with("// Code generated by thrift-vgen "));
    assert!(file.contains("package shop\n\nimport (\n\t\"errors\"\n\t\"regexp\"\n\t\"strings\"\n)\n\n"));

    let line = file.find("func (p *OrderLine) IsValid() error {").unwrap();
    let order = file.find("func (p *Order) IsValid() error {").unwrap();
    assert!(line < order);

    assert!(file.contains("\tif len(p.Sku) < 3 {\n\t\treturn errors.New(\"p.Sku not valid, rule vt.min_size check failed\")\n\t}\n"));
    assert!(file.contains("\tif p.Quantity > int32(p.MaxQuantity) {\n"));
    assert!(file.contains("\tif p.Status != nil {\n\t\tif (*p.Status).String() == \"<UNSET>\" {\n"));
}

#[test]
fn nested_containers_and_structs() {
    let doc = document();
    let order = generate_struct(&doc.structs[1]).unwrap().body.render(0);

    assert_eq!(
        order,
        r#"if len(p.Lines) < 1 {
	return errors.New("p.Lines not valid, rule vt.min_size check failed")
}
for _i0 := 0; _i0 < len(p.Lines); _i0++ {
	_elem1 := p.Lines[_i0]
	if err := _elem1.IsValid(); err != nil {
		return err
	}
}
for _i2 := 0; _i2 < len(p.Buckets); _i2++ {
	_elem3 := p.Buckets[_i2]
	for _i4 := 0; _i4 < len(_elem3); _i4++ {
		_elem5 := _elem3[_i4]
		_src6 := []int64{0}
		for _, _v7 := range _src6 {
			if _elem5 == _v7 {
				return errors.New("_elem5 not valid, rule vt.not_in check failed")
			}
		}
	}
}
for _i8 := 0; _i8 < len(p.Buckets); _i8++ {
	_elem9 := p.Buckets[_i8]
	if len(_elem9) > len(p.Lines) {
		return errors.New("_elem9 not valid, rule vt.max_size check failed")
	}
}
for _key10 := range p.Labels {
	if !strings.HasPrefix(_key10, "x-") {
		return errors.New("_key10 not valid, rule vt.prefix check failed")
	}
}
for _, _value11 := range p.Labels {
	_tgt12 := string(_value11)
	if len(_tgt12) > 64 {
		return errors.New("_value11 not valid, rule vt.max_size check failed")
	}
}
if !p.Draft {
	if err := p.Billing.IsValid(); err != nil {
		return err
	}
}
"#
    );
}

#[test]
fn generation_is_deterministic() {
    let doc = document();
    assert_eq!(render(&doc), render(&doc));
}

#[test]
fn failures_name_struct_and_field() {
    let doc: Document = serde_json::from_value(json!({
        "package": "shop",
        "structs": [{
            "name": "Coupon",
            "fields": [
                { "name": "code", "type": "string", "annotations": { "vt.min_size": ["@count($code)"] } }
            ]
        }]
    }))
    .unwrap();
    let err = generate_struct(&doc.structs[0]).unwrap_err();
    assert!(matches!(err, CodegenError::Field { .. }));
    assert_eq!(err.to_string(), "Coupon.code: validator error: unsupported function: count");
}
