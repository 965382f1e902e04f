//! Java source tree integration tests
//!
//! Converts mappings against real `.java` files, saves, re-indexes and
//! converts again.

use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use xml2anno::commands::{run_convert, ConvertOptions};
use xml2anno::{convert, Config, JavaProject, MappingDocument, Span};

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn read(dir: &Path, relative: &str) -> String {
    std::fs::read_to_string(dir.join(relative)).unwrap()
}

// =============================================================================
// Hibernate against Java sources
// =============================================================================

mod hibernate_source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ORDER_JAVA: &str = r#"package com.shop;

import java.util.List;

public class Order {
    private Long id;

    @Column(name = "customer_email")
    private String email;

    private Customer customer;

    private List<OrderLine> lines;
}
"#;

    const ORDER_MAPPING: &str = r#"<?xml version="1.0"?>
<!DOCTYPE hibernate-mapping PUBLIC
    "-//Hibernate/Hibernate Mapping DTD 3.0//EN"
    "http://www.hibernate.org/dtd/hibernate-mapping-3.0.dtd">
<hibernate-mapping package="com.shop">
    <class name="Order" table="orders">
        <id name="id" column="id">
            <generator class="sequence"/>
        </id>
        <property name="email" column="email" not-null="true"/>
        <many-to-one name="customer" column="customer_id"/>
        <one-to-many name="lines" mapped-by="order" fetch="lazy"/>
    </class>
</hibernate-mapping>
"#;

    const ORDER_EXPECTED: &str = r#"package com.shop;

import java.util.List;
import javax.persistence.*;

@Entity
@Table(name = "orders")
public class Order {
    @Id
    @GeneratedValue(strategy = GenerationType.SEQUENCE)
    @Column(name = "id")
    private Long id;

    @Column(name = "customer_email")
    private String email;

    @ManyToOne
    @JoinColumn(name = "customer_id")
    private Customer customer;

    @OneToMany(mappedBy = "order", fetch = FetchType.LAZY)
    private List<OrderLine> lines;
}
"#;

    fn setup() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/com/shop/Order.java", ORDER_JAVA);
        write(dir.path(), "target/generated/Order.java", "class Stale {}");
        dir
    }

    #[test]
    fn test_convert_and_save() {
        let dir = setup();
        let config = Config::default();
        let document = MappingDocument::parse(ORDER_MAPPING).unwrap();

        let mut project = JavaProject::load(dir.path(), &config).unwrap();
        assert_eq!(project.file_count(), 1);

        let report = convert(&document, None, &mut project).unwrap();
        assert_eq!(report.annotations_added, 8);
        assert_eq!(report.annotations_present, 1);
        assert!(report.diagnostics.is_empty());
        assert_eq!(project.section_count(), 1);

        let changes = project.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].after, ORDER_EXPECTED);
        assert_eq!(changes[0].lines_added(), 9);

        // Nothing touches disk before save
        assert_eq!(read(dir.path(), "src/com/shop/Order.java"), ORDER_JAVA);
        project.save().unwrap();
        assert_eq!(read(dir.path(), "src/com/shop/Order.java"), ORDER_EXPECTED);
    }

    #[test]
    fn test_reconverting_saved_sources_changes_nothing() {
        let dir = setup();
        let config = Config::default();
        let document = MappingDocument::parse(ORDER_MAPPING).unwrap();

        let mut project = JavaProject::load(dir.path(), &config).unwrap();
        convert(&document, None, &mut project).unwrap();
        project.save().unwrap();

        let mut reloaded = JavaProject::load(dir.path(), &config).unwrap();
        let report = convert(&document, None, &mut reloaded).unwrap();

        assert_eq!(report.annotations_added, 0);
        assert_eq!(report.annotations_present, 9);
        assert!(reloaded.changes().is_empty());
    }

    #[test]
    fn test_default_import_is_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Item.java",
            "package a;\n\nimport javax.persistence.*;\n\npublic class Item {\n    private Long id;\n}\n",
        );
        let document = MappingDocument::parse(
            r#"<hibernate-mapping><class name="a.Item"><id name="id"/></class></hibernate-mapping>"#,
        )
        .unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        convert(&document, None, &mut project).unwrap();

        let after = &project.changes()[0].after;
        assert_eq!(after.matches("import javax.persistence.*;").count(), 1);
        assert!(after.contains("@Entity\npublic class Item {\n    @Id\n    private Long id;"));
    }

    #[test]
    fn test_file_without_imports_gets_import_block() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Tag.java", "package a;\n\npublic class Tag {\n}\n");
        let document =
            MappingDocument::parse(r#"<hibernate-mapping><class name="a.Tag"/></hibernate-mapping>"#)
                .unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        convert(&document, None, &mut project).unwrap();

        assert_eq!(
            project.changes()[0].after,
            "package a;\n\nimport javax.persistence.*;\n\n@Entity\npublic class Tag {\n}\n"
        );
    }

    #[test]
    fn test_shared_declaration_gets_one_annotation_per_name() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Pair.java",
            "package a;\n\npublic class Pair {\n    private String left, right;\n}\n",
        );
        let document = MappingDocument::parse(
            r#"<hibernate-mapping>
    <class name="a.Pair">
        <property name="left" column="L"/>
        <property name="right" column="R"/>
    </class>
</hibernate-mapping>"#,
        )
        .unwrap();
        let config = Config::default();

        let mut project = JavaProject::load(dir.path(), &config).unwrap();
        let report = convert(&document, None, &mut project).unwrap();

        assert_eq!(report.annotations_added, 2);
        assert_eq!(report.annotations_present, 1);
        assert_eq!(
            project.changes()[0].after,
            "package a;\n\nimport javax.persistence.*;\n\n@Entity\npublic class Pair {\n    @Column(name = \"L\")\n    private String left, right;\n}\n"
        );

        project.save().unwrap();
        let mut reloaded = JavaProject::load(dir.path(), &config).unwrap();
        let report = convert(&document, None, &mut reloaded).unwrap();
        assert_eq!(report.annotations_added, 0);
        assert!(reloaded.changes().is_empty());
    }

    #[test]
    fn test_jakarta_wildcard_blocks_default_import() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Item.java",
            "package a;\n\nimport jakarta.persistence.*;\n\npublic class Item {\n    private Long id;\n}\n",
        );
        let document = MappingDocument::parse(
            r#"<hibernate-mapping><class name="a.Item"><id name="id"/></class></hibernate-mapping>"#,
        )
        .unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        convert(&document, None, &mut project).unwrap();

        assert_eq!(
            project.changes()[0].after,
            "package a;\n\nimport jakarta.persistence.*;\n\n@Entity\npublic class Item {\n    @Id\n    private Long id;\n}\n"
        );
    }

    #[test]
    fn test_single_type_import_blocks_default_import() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Tag.java",
            "package a;\n\nimport jakarta.persistence.Entity;\n\npublic class Tag {\n}\n",
        );
        let document =
            MappingDocument::parse(r#"<hibernate-mapping><class name="a.Tag"/></hibernate-mapping>"#)
                .unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        let report = convert(&document, None, &mut project).unwrap();

        assert_eq!(report.annotations_added, 1);
        assert_eq!(
            project.changes()[0].after,
            "package a;\n\nimport jakarta.persistence.Entity;\n\n@Entity\npublic class Tag {\n}\n"
        );
    }

    #[test]
    fn test_invalid_text_never_reaches_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Cfg.java",
            "package a;\n\npublic class Cfg {\n    String path;\n}\n",
        );
        let document = MappingDocument::parse(
            r#"<beans><bean class="a.Cfg"><property name="path" value="say &quot;hi&quot;"/></bean></beans>"#,
        )
        .unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        let report = convert(&document, None, &mut project).unwrap();

        assert_eq!(report.annotations_rejected, 1);
        assert_eq!(report.diagnostics.len(), 1);
        let after = &project.changes()[0].after;
        assert!(after.contains("@Component\npublic class Cfg"));
        assert!(after.contains("    String path;"));
        assert!(!after.contains("@Value"));
    }
}

// =============================================================================
// Spring against Java sources
// =============================================================================

mod spring_source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SERVICE_JAVA: &str = r#"package com.shop.service;

import com.shop.OrderRepository;

public class OrderService {
    private OrderRepository repository;
    private int limit;

    public OrderService() {
    }

    public OrderService(OrderRepository repository, int limit) {
        this.repository = repository;
        this.limit = limit;
    }
}
"#;

    const BEANS: &str = r#"<beans>
    <bean id="orderService" class="com.shop.service.OrderService">
        <constructor-arg ref="orderRepository"/>
        <constructor-arg value="25"/>
        <property name="repository" ref="orderRepository"/>
        <property name="limit" value="25"/>
    </bean>
</beans>
"#;

    #[test]
    fn test_qualified_annotations_are_shortened_and_imported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "OrderService.java", SERVICE_JAVA);
        let document = MappingDocument::parse(BEANS).unwrap();

        let mut project = JavaProject::load(dir.path(), &Config::default()).unwrap();
        let report = convert(&document, None, &mut project).unwrap();
        assert_eq!(report.annotations_added, 4);

        let after = &project.changes()[0].after;
        assert!(after.contains(
            "import com.shop.OrderRepository;\n\
             import org.springframework.stereotype.Component;\n\
             import org.springframework.beans.factory.annotation.Autowired;\n\
             import org.springframework.beans.factory.annotation.Value;\n"
        ));
        assert!(!after.contains("javax.persistence"));
        assert!(after.contains("@Component\npublic class OrderService {"));
        assert!(after.contains("    @Autowired\n    private OrderRepository repository;"));
        assert!(after.contains("    @Value(\"25\")\n    private int limit;"));
        assert!(after.contains("    public OrderService() {"));
        assert!(after.contains(
            "    @Autowired\n    public OrderService(OrderRepository repository, int limit) {"
        ));
        assert_eq!(after.matches("@Autowired").count(), 2);
    }

    #[test]
    fn test_reconverting_saved_sources_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "OrderService.java", SERVICE_JAVA);
        let document = MappingDocument::parse(BEANS).unwrap();
        let config = Config::default();

        let mut project = JavaProject::load(dir.path(), &config).unwrap();
        convert(&document, None, &mut project).unwrap();
        project.save().unwrap();

        let mut reloaded = JavaProject::load(dir.path(), &config).unwrap();
        let report = convert(&document, None, &mut reloaded).unwrap();
        assert_eq!(report.annotations_added, 0);
        assert!(reloaded.changes().is_empty());
    }

    #[test]
    fn test_qualified_names_kept_when_shortening_is_off() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "OrderService.java", SERVICE_JAVA);
        let document = MappingDocument::parse(BEANS).unwrap();
        let mut config = Config::default();
        config.imports.shorten_qualified = false;

        let mut project = JavaProject::load(dir.path(), &config).unwrap();
        convert(&document, None, &mut project).unwrap();

        let after = &project.changes()[0].after;
        assert!(after.contains("@org.springframework.stereotype.Component\npublic class OrderService"));
        assert!(!after.contains("import org.springframework"));
    }
}

// =============================================================================
// Convert command
// =============================================================================

mod convert_command_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_CLASSES: &str = "<hibernate-mapping package=\"a\">
    <class name=\"First\"/>
    <class name=\"Second\"/>
</hibernate-mapping>
";

    fn setup() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/First.java", "package a;\n\nclass First {}\n");
        write(dir.path(), "src/Second.java", "package a;\n\nclass Second {}\n");
        write(dir.path(), "mapping.hbm.xml", TWO_CLASSES);
        dir
    }

    fn options(dir: &Path) -> ConvertOptions {
        ConvertOptions {
            mapping: dir.join("mapping.hbm.xml"),
            source: Some(dir.join("src")),
            ..ConvertOptions::default()
        }
    }

    #[test]
    fn test_preview_does_not_write() {
        let dir = setup();
        let run = run_convert(&options(dir.path()), &Config::default()).unwrap();

        assert_eq!(run.report.units_converted, 2);
        assert_eq!(run.changes.len(), 2);
        assert!(run.written.is_empty());
        assert_eq!(read(dir.path(), "src/First.java"), "package a;\n\nclass First {}\n");
    }

    #[test]
    fn test_lines_limit_units() {
        let dir = setup();
        let opts = ConvertOptions {
            lines: Some(Span::new(3, 3)),
            apply: true,
            ..options(dir.path())
        };
        let run = run_convert(&opts, &Config::default()).unwrap();

        assert_eq!(run.report.units_selected, 1);
        assert_eq!(run.written, vec![dir.path().join("src/Second.java")]);
        assert_eq!(
            read(dir.path(), "src/Second.java"),
            "package a;\n\nimport javax.persistence.*;\n\n@Entity\nclass Second {}\n"
        );
        assert_eq!(read(dir.path(), "src/First.java"), "package a;\n\nclass First {}\n");
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let dir = setup();
        let opts = ConvertOptions {
            kind: Some(xml2anno::DocumentKind::Spring),
            ..options(dir.path())
        };
        assert!(run_convert(&opts, &Config::default()).is_err());
    }

    #[test]
    fn test_range_and_lines_are_exclusive() {
        let dir = setup();
        let opts = ConvertOptions {
            range: Some(Span::new(0, 10)),
            lines: Some(Span::new(1, 2)),
            ..options(dir.path())
        };
        assert!(run_convert(&opts, &Config::default()).is_err());
    }
}
