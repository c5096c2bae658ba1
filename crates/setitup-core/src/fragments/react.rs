//! React (Vite + Tailwind) fragments

use super::FragmentOptions;

pub fn navbar(o: &FragmentOptions) -> String {
    let mut text = String::new();
    if o.router {
        text.push_str("import { Link } from 'react-router-dom';\n");
    }
    if o.context {
        text.push_str("import { useAppContext } from '../context/AppContext';\n");
    }
    if !text.is_empty() {
        text.push('\n');
    }

    text.push_str("export function Navbar() {\n");
    if o.context {
        text.push_str("  const { theme, toggleTheme } = useAppContext();\n\n");
    }
    text.push_str(
        r#"  return (
    <nav className="p-4 bg-white dark:bg-gray-800 shadow-md flex justify-between items-center">
      <h1 className="text-xl font-bold text-blue-600">My App</h1>
      <div className="flex gap-4">
"#,
    );
    if o.router {
        text.push_str(
            r#"        <Link to="/" className="text-gray-700 dark:text-gray-200 hover:text-blue-500">Home</Link>
        <Link to="/about" className="text-gray-700 dark:text-gray-200 hover:text-blue-500">About</Link>
"#,
        );
    }
    if o.context {
        text.push_str(
            r#"        <button onClick={toggleTheme} className="px-3 py-1 bg-gray-200 rounded text-sm">
          {theme === 'light' ? '🌙' : '☀️'}
        </button>
"#,
        );
    }
    text.push_str(
        "      </div>
    </nav>
  );
}
",
    );
    text
}

/// Without a router there is no `<Outlet />`, so the layout renders its children
pub fn layout(o: &FragmentOptions) -> String {
    let mut text = String::new();
    if o.router {
        text.push_str("import { Outlet } from 'react-router-dom';\n");
    } else if o.typescript {
        text.push_str("import type { ReactNode } from 'react';\n");
    }
    text.push_str("import { Navbar } from './Navbar';\n\n");

    let (signature, slot) = if o.router {
        ("export function Layout() {", "<Outlet />".to_string())
    } else {
        let signature = if o.typescript {
            "export function Layout({ children }: { children?: ReactNode }) {"
        } else {
            "export function Layout({ children }) {"
        };
        (
            signature,
            r#"{children ?? <div className="text-center p-10">Outlet requires Router</div>}"#
                .to_string(),
        )
    };

    text.push_str(signature);
    text.push_str(&format!(
        r#"
  return (
    <div className="min-h-screen bg-gray-50 dark:bg-gray-900 transition-colors font-sans">
      <Navbar />
      <main className="container mx-auto p-4">
        {slot}
      </main>
    </div>
  );
}}
"#
    ));
    text
}

pub fn home(o: &FragmentOptions) -> String {
    let mut text = String::new();
    if o.shadcn {
        text.push_str("import { Button } from '@/components/ui/button';\n\n");
    }
    text.push_str(
        r#"export default function Home() {
  return (
    <div className="flex flex-col items-center justify-center py-10">
      <h1 className="text-4xl font-bold text-gray-800 dark:text-white mb-6">Welcome Home 🏠</h1>
      <p className="text-gray-600 dark:text-gray-300 mb-8 max-w-md text-center">
        This is the starting point of your amazing application.
      </p>

      <div className="flex gap-4">
        <div className="px-4 py-2 bg-white rounded shadow text-green-600 font-bold">✔ React</div>
        <div className="px-4 py-2 bg-white rounded shadow text-blue-600 font-bold">✔ Tailwind</div>
      </div>
"#,
    );
    if o.shadcn {
        text.push_str(
            r#"
      <div className="mt-8">
        <Button onClick={() => alert('Shadcn Button Works!')}>Shadcn Button</Button>
      </div>
"#,
        );
    }
    text.push_str(
        "    </div>
  );
}
",
    );
    text
}

pub fn about() -> String {
    r#"export default function About() {
  return (
    <div className="text-center py-10">
      <h1 className="text-3xl font-bold text-gray-800 dark:text-white">About Us</h1>
      <p className="mt-4 text-gray-600 dark:text-gray-300">
        We are building the future with modern web technologies.
      </p>
    </div>
  );
}
"#
    .to_string()
}

/// `src/App`: router and context wrappers nest around the layout
pub fn app(o: &FragmentOptions) -> String {
    let mut imports = vec!["import { Layout } from './components/Layout';"];
    imports.push("import Home from './pages/Home';");
    if o.router {
        imports.push("import About from './pages/About';");
        imports.push("import { BrowserRouter, Routes, Route } from 'react-router-dom';");
    }
    if o.context {
        imports.push("import { AppProvider } from './context/AppContext';");
    }

    let mut tree: Vec<String> = if o.router {
        [
            "<BrowserRouter>",
            "  <Routes>",
            "    <Route path=\"/\" element={<Layout />}>",
            "      <Route index element={<Home />} />",
            "      <Route path=\"about\" element={<About />} />",
            "    </Route>",
            "  </Routes>",
            "</BrowserRouter>",
        ]
        .iter()
        .map(|line| line.to_string())
        .collect()
    } else {
        ["<Layout>", "  <Home />", "</Layout>"]
            .iter()
            .map(|line| line.to_string())
            .collect()
    };

    if o.context {
        tree = std::iter::once("<AppProvider>".to_string())
            .chain(tree.into_iter().map(|line| format!("  {}", line)))
            .chain(std::iter::once("</AppProvider>".to_string()))
            .collect();
    }

    let mut text = imports.join("\n");
    text.push_str("\n\nfunction App() {\n  return (\n");
    for line in &tree {
        text.push_str("    ");
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("  );\n}\n\nexport default App;\n");
    text
}

/// `src/context/AppContext`: theme provider and hook
pub fn app_context(o: &FragmentOptions) -> String {
    if o.typescript {
        r#"import { createContext, useContext, useState, type ReactNode } from 'react';

interface AppContextType {
  theme: string;
  toggleTheme: () => void;
}

const AppContext = createContext<AppContextType | undefined>(undefined);

export const AppProvider = ({ children }: { children: ReactNode }) => {
  const [theme, setTheme] = useState('light');

  const toggleTheme = () => {
    setTheme((prev) => (prev === 'light' ? 'dark' : 'light'));
  };

  return (
    <AppContext.Provider value={{ theme, toggleTheme }}>
      {children}
    </AppContext.Provider>
  );
};

export const useAppContext = () => {
  const context = useContext(AppContext);
  if (!context) {
    throw new Error('useAppContext must be used within an AppProvider');
  }
  return context;
};
"#
        .to_string()
    } else {
        r#"import { createContext, useContext, useState } from 'react';

const AppContext = createContext(undefined);

export const AppProvider = ({ children }) => {
  const [theme, setTheme] = useState('light');

  const toggleTheme = () => {
    setTheme((prev) => (prev === 'light' ? 'dark' : 'light'));
  };

  return (
    <AppContext.Provider value={{ theme, toggleTheme }}>
      {children}
    </AppContext.Provider>
  );
};

export const useAppContext = () => {
  const context = useContext(AppContext);
  if (!context) {
    throw new Error('useAppContext must be used within an AppProvider');
  }
  return context;
};
"#
        .to_string()
    }
}

/// `vite.config`: same text for `.ts` and `.js`
pub fn vite_config() -> String {
    r#"import path from 'path';
import react from '@vitejs/plugin-react';
import tailwindcss from '@tailwindcss/vite';
import { defineConfig } from 'vite';

// https://vitejs.dev/config/
export default defineConfig({
  plugins: [react(), tailwindcss()],
  resolve: {
    alias: {
      '@': path.resolve(__dirname, './src'),
    },
  },
});
"#
    .to_string()
}

pub fn stylesheet() -> String {
    "@import \"tailwindcss\";\n".to_string()
}

/// `jsconfig.json`: keeps the `@/` alias resolvable once tsconfig is gone
pub fn alias_config() -> String {
    r#"{
  "compilerOptions": {
    "baseUrl": ".",
    "paths": {
      "@/*": ["./src/*"]
    }
  }
}
"#
    .to_string()
}
