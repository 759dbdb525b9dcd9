//! Source templates for generated packages and new workspaces.

use serde_json::{json, Value};

use crate::util::naming::{kebab_case, pascal_case, sentence_case};

/// Names derived from a requested component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNames {
    /// File stem and selector suffix, e.g. `date-picker`
    pub kebab: String,
    /// Custom element tag, e.g. `zero-date-picker`
    pub selector: String,
    /// TypeScript class name, e.g. `DatePicker`
    pub class_name: String,
    /// Human label, e.g. `Date picker`
    pub label: String,
}

impl ComponentNames {
    pub fn new(name: &str, selector_prefix: &str) -> Self {
        let kebab = kebab_case(name);
        let selector = if selector_prefix.is_empty() {
            kebab.clone()
        } else {
            format!("{}-{}", selector_prefix, kebab)
        };
        ComponentNames {
            selector,
            class_name: pascal_case(name),
            label: sentence_case(name),
            kebab,
        }
    }
}

/// Names derived from a requested module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    /// Module id, e.g. `modsales-report`
    pub id: String,
    /// JavaScript class name, e.g. `SalesReport`
    pub class_name: String,
}

impl ModuleNames {
    pub fn new(name: &str, id_prefix: &str) -> Self {
        ModuleNames {
            id: format!("{}{}", id_prefix, kebab_case(name)),
            class_name: pascal_case(name),
        }
    }
}

/// A Lit custom element.
pub fn component_source(names: &ComponentNames, description: &str) -> String {
    format!(
        r#"import {{ LitElement, css, html }} from 'lit';
import {{ customElement, property }} from 'lit/decorators.js';

/**
 * {label}
 *
 * {description}
 */
@customElement('{selector}')
export class {class} extends LitElement {{
  static styles = css`
    :host {{
      display: block;
    }}
  `;

  @property({{ type: String }})
  label = '{label}';

  render() {{
    return html`<div part="root">${{this.label}}</div>`;
  }}

  protected notifyChange(detail: unknown) {{
    this.dispatchEvent(new CustomEvent('change', {{ detail, bubbles: true, composed: true }}));
  }}
}}

declare global {{
  interface HTMLElementTagNameMap {{
    '{selector}': {class};
  }}
}}
"#,
        label = names.label,
        description = description,
        selector = names.selector,
        class = names.class_name,
    )
}

/// A plain module class.
pub fn module_source(names: &ModuleNames, description: &str) -> String {
    format!(
        r#"/**
 * {description}
 */
export class {class} {{
  static id = '{id}';

  constructor(context = {{}}) {{
    this.context = context;
  }}

  async init() {{
    return this;
  }}

  async destroy() {{}}
}}

export default {class};
"#,
        description = description,
        class = names.class_name,
        id = names.id,
    )
}

/// `package.json` of a new workspace.
pub fn workspace_manifest(name: &str) -> Value {
    json!({
        "name": name,
        "version": "1.0.0",
        "private": true,
        "type": "module",
        "workspaces": ["packages/*"],
        "scripts": {
            "build": "zerogen build",
            "start": "zerogen start",
            "serve": "zerogen serve"
        },
        "devDependencies": {
            "esbuild": "^0.23.0",
            "lit": "^3.1.4",
            "typescript": "^5.2.2",
            "vite": "^5.3.0"
        },
        "dependencies": {
            "express": "^4.19.2"
        }
    })
}

/// TypeScript project used by the workspace-wide type check.
pub fn tsconfig() -> Value {
    json!({
        "compilerOptions": {
            "target": "ES2021",
            "module": "ESNext",
            "moduleResolution": "bundler",
            "lib": ["ES2021", "DOM", "DOM.Iterable"],
            "strict": true,
            "noEmit": true,
            "experimentalDecorators": true,
            "useDefineForClassFields": false,
            "allowImportingTsExtensions": true,
            "skipLibCheck": true
        },
        "include": ["index.ts", "public-api.ts", "packages/**/*.ts"],
        "exclude": ["node_modules", "packages/*/dist"]
    })
}

pub const GITIGNORE: &str = "node_modules/\npackages/*/dist/\nserver/plugins/\n.zerogen/\n";

/// Dev-server page that mounts every exported component.
pub const INDEX_TS: &str = r#"import * as exported from './public-api.ts';

const mount = (tag: string) => {
  const frame = document.createElement('fieldset');
  const legend = document.createElement('legend');
  legend.textContent = tag;
  frame.appendChild(legend);

  const element = document.createElement(tag);
  element.addEventListener('change', (event) => console.log(`[${tag}] change`, event));
  frame.appendChild(element);
  document.body.appendChild(frame);
};

document.addEventListener('DOMContentLoaded', () => {
  for (const value of Object.values(exported)) {
    const tag = typeof value === 'function' ? customElements.getName?.(value as CustomElementConstructor) : null;
    if (tag) {
      mount(tag);
    }
  }
});
"#;

/// Static server for published plugin bundles.
pub const SERVER_INDEX_JS: &str = r#"import express from 'express';
import { readdir, unlink, writeFile } from 'node:fs/promises';
import { join, resolve } from 'node:path';
import { env } from 'node:process';

const port = Number(env.PORT || 5555);
const basePath = env.BASE_PATH || '';
const pluginDir = resolve(env.PLUGIN_DIR_ROOT || 'plugins');

const router = express.Router();

router.get('/ping', (_req, res) => res.json({ message: 'pong' }));

router.get('/files', async (_req, res) => {
  try {
    res.json({ files: await readdir(pluginDir) });
  } catch {
    res.status(500).json({ error: 'failed to list files' });
  }
});

router.post('/files', async (req, res) => {
  const { fileName, content } = req.body ?? {};
  if (!fileName || !content) {
    return res.status(400).json({ error: 'fileName and content are required' });
  }
  try {
    await writeFile(join(pluginDir, fileName), content);
    res.status(201).json({ message: 'created' });
  } catch {
    res.status(500).json({ error: 'failed to write file' });
  }
});

router.delete('/files/:fileName', async (req, res) => {
  try {
    await unlink(join(pluginDir, req.params.fileName));
    res.json({ message: 'deleted' });
  } catch {
    res.status(500).json({ error: 'failed to delete file' });
  }
});

router.use('/plugins', express.static(pluginDir));

const app = express();
app.use(express.json());
app.use(basePath, router);
app.listen(port, () => console.log(`plugin server on http://localhost:${port}${basePath}`));
"#;
