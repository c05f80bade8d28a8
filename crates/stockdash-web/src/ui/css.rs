//! Dashboard styles, themed through CSS custom properties.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0d1117;
    --card: #161b22;
    --border: #30363d;
    --text: #c9d1d9;
    --text-dim: #8b949e;
    --green: #3fb950;
    --red: #f85149;
    --blue: #58a6ff;
    --yellow: #d29922;
    --purple: #a371f7;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    padding: 20px;
    min-height: 100vh;
}

.container { max-width: 1200px; margin: 0 auto; }

header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 16px;
    padding-bottom: 16px;
    border-bottom: 1px solid var(--border);
}

h1 { font-size: 24px; font-weight: 600; }
h2 { font-size: 20px; font-weight: 600; margin: 8px 0 4px; }

.header-controls { display: flex; align-items: center; gap: 12px; }
.refresh-time { font-size: 12px; color: var(--text-dim); }
.description { color: var(--text-dim); font-size: 13px; margin-bottom: 12px; }

select, input {
    background: var(--card);
    color: var(--text);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 6px 8px;
    font-size: 13px;
}

.btn {
    padding: 8px 16px;
    border-radius: 6px;
    border: none;
    font-size: 13px;
    font-weight: 500;
    cursor: pointer;
}

.btn:disabled { opacity: 0.6; cursor: not-allowed; }
.btn-primary { background: var(--blue); color: #fff; }

/* Argument form */
.args {
    display: flex;
    flex-wrap: wrap;
    gap: 12px;
    margin-bottom: 16px;
}

.args label {
    display: flex;
    flex-direction: column;
    gap: 4px;
    font-size: 12px;
    color: var(--text-dim);
}

.args label.checkbox { flex-direction: row; align-items: center; }
.hidden { display: none !important; }

/* Widgets */
#page { display: flex; flex-direction: column; gap: 16px; }

.metrics-row {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    gap: 16px;
}

.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 16px 20px;
}

.card-title {
    font-size: 13px;
    color: var(--text-dim);
    text-transform: uppercase;
    letter-spacing: 0.5px;
    margin-bottom: 12px;
}

.metric-value { font-size: 24px; font-weight: 700; }
.metric-delta { font-size: 13px; margin-top: 4px; }

.positive { color: var(--green); }
.negative { color: var(--red); }
.neutral { color: var(--text-dim); }

table { width: 100%; border-collapse: collapse; font-size: 13px; }
th { text-align: left; color: var(--text-dim); font-weight: 500; padding: 8px; border-bottom: 1px solid var(--border); }
td { padding: 8px; border-bottom: 1px solid var(--border); font-variant-numeric: tabular-nums; }
tr:last-child td { border-bottom: none; }

/* Alerts */
.alert { border-radius: 8px; padding: 12px 16px; border-left: 4px solid; }
.alert-title { font-weight: 600; margin-bottom: 4px; }
.alert-info { background: rgba(88, 166, 255, 0.1); border-color: var(--blue); }
.alert-warning { background: rgba(210, 153, 34, 0.1); border-color: var(--yellow); }
.alert-critical { background: rgba(248, 81, 73, 0.1); border-color: var(--red); }

.error {
    background: rgba(248, 81, 73, 0.1);
    border: 1px solid var(--red);
    color: var(--red);
    border-radius: 8px;
    padding: 12px 16px;
    margin-bottom: 16px;
}

.commentary { border-left: 4px solid var(--purple); white-space: pre-wrap; line-height: 1.5; }
.commentary .model { font-size: 11px; color: var(--text-dim); margin-top: 8px; }

/* Charts */
svg.chart { width: 100%; height: auto; display: block; }
svg.chart .axis { stroke: var(--border); stroke-width: 1; }
svg.chart text { fill: var(--text-dim); font-size: 10px; }
.legend { display: flex; flex-wrap: wrap; gap: 12px; font-size: 12px; margin-top: 8px; }
.legend span::before { content: ''; display: inline-block; width: 10px; height: 10px; margin-right: 4px; background: var(--swatch); border-radius: 2px; }

.empty-state { text-align: center; color: var(--text-dim); padding: 48px; }

@media (max-width: 768px) {
    header { flex-direction: column; gap: 12px; align-items: flex-start; }
}
";
